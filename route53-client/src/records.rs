//! Typed DNS record values and the type-tag decoder registry
//!
//! Each record type knows how to read itself from a `<ResourceRecord>` element
//! and how to render its `<Value>` text. [`decoder_for`] maps the `Type` tag of a
//! `ResourceRecordSet` to the matching decoder; supporting a new type means
//! implementing [`RecordCodec`], adding a [`Record`] variant and one registry entry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, Route53Error};
use crate::name::Name;
use crate::xml::XmlElement;

/// Wire encoding shared by all record types.
pub trait RecordCodec: Sized {
    /// DNS type tag, e.g. `"SOA"`.
    const RECORD_TYPE: &'static str;

    /// Parses the text of a `<Value>` element.
    fn parse_value(value: &str) -> Result<Self>;

    /// Renders the text of a `<Value>` element; the exact inverse of [`parse_value`](Self::parse_value).
    fn encode(&self) -> String;

    /// Decodes a `<ResourceRecord>` element.
    fn decode(element: &XmlElement) -> Result<Self> {
        let value = element
            .find("Value")
            .and_then(XmlElement::text)
            .ok_or_else(|| {
                Route53Error::malformed_record(
                    Self::RECORD_TYPE,
                    "",
                    "<ResourceRecord> has no <Value> text",
                )
            })?;
        Self::parse_value(value)
    }
}

fn parse_name(record_type: &str, value: &str, field: &str, text: &str) -> Result<Name> {
    Name::new(text).map_err(|e| {
        Route53Error::malformed_record(record_type, value, format!("invalid {field}: {e}"))
    })
}

// ============ SOA ============

/// Start of authority record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Soa {
    /// Primary name server.
    pub mname: Name,
    /// Mailbox of the responsible person.
    pub rname: Name,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    /// Negative caching TTL.
    pub minimum: u32,
}

impl RecordCodec for Soa {
    const RECORD_TYPE: &'static str = "SOA";

    fn parse_value(value: &str) -> Result<Self> {
        let fields: Vec<&str> = value.split_whitespace().collect();
        let [mname, rname, serial, refresh, retry, expire, minimum] = fields[..] else {
            return Err(Route53Error::malformed_record(
                Self::RECORD_TYPE,
                value,
                format!("expected 7 fields, found {}", fields.len()),
            ));
        };

        let number = |field: &str, text: &str| -> Result<u32> {
            text.parse().map_err(|_| {
                Route53Error::malformed_record(
                    Self::RECORD_TYPE,
                    value,
                    format!("{field} '{text}' is not an unsigned 32-bit integer"),
                )
            })
        };

        Ok(Self {
            mname: parse_name(Self::RECORD_TYPE, value, "mname", mname)?,
            rname: parse_name(Self::RECORD_TYPE, value, "rname", rname)?,
            serial: number("serial", serial)?,
            refresh: number("refresh", refresh)?,
            retry: number("retry", retry)?,
            expire: number("expire", expire)?,
            minimum: number("minimum", minimum)?,
        })
    }

    fn encode(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.mname,
            self.rname,
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum
        )
    }
}

// ============ NS ============

/// Name server record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ns {
    pub nameserver: Name,
}

impl RecordCodec for Ns {
    const RECORD_TYPE: &'static str = "NS";

    fn parse_value(value: &str) -> Result<Self> {
        Ok(Self {
            nameserver: parse_name(Self::RECORD_TYPE, value, "nameserver", value.trim())?,
        })
    }

    fn encode(&self) -> String {
        self.nameserver.to_ascii().to_string()
    }
}

// ============ CNAME ============

/// Canonical name record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cname {
    pub canonical_name: Name,
}

impl RecordCodec for Cname {
    const RECORD_TYPE: &'static str = "CNAME";

    fn parse_value(value: &str) -> Result<Self> {
        Ok(Self {
            canonical_name: parse_name(Self::RECORD_TYPE, value, "canonical name", value.trim())?,
        })
    }

    fn encode(&self) -> String {
        self.canonical_name.to_ascii().to_string()
    }
}

// ============ Text form ============

macro_rules! impl_record_text {
    ($($ty:ty),+ $(,)?) => {$(
        impl std::str::FromStr for $ty {
            type Err = Route53Error;

            fn from_str(value: &str) -> Result<Self> {
                Self::parse_value(value)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.encode())
            }
        }
    )+};
}

impl_record_text!(Soa, Ns, Cname);

// ============ Record ============

/// Any supported record value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Record {
    #[serde(rename = "SOA")]
    Soa(Soa),
    #[serde(rename = "NS")]
    Ns(Ns),
    #[serde(rename = "CNAME")]
    Cname(Cname),
}

impl Record {
    /// DNS type tag of the contained value.
    pub fn record_type(&self) -> &'static str {
        match self {
            Self::Soa(_) => Soa::RECORD_TYPE,
            Self::Ns(_) => Ns::RECORD_TYPE,
            Self::Cname(_) => Cname::RECORD_TYPE,
        }
    }

    /// `<Value>` text of the contained value.
    pub fn encode(&self) -> String {
        match self {
            Self::Soa(r) => r.encode(),
            Self::Ns(r) => r.encode(),
            Self::Cname(r) => r.encode(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<Soa> for Record {
    fn from(record: Soa) -> Self {
        Self::Soa(record)
    }
}

impl From<Ns> for Record {
    fn from(record: Ns) -> Self {
        Self::Ns(record)
    }
}

impl From<Cname> for Record {
    fn from(record: Cname) -> Self {
        Self::Cname(record)
    }
}

// ============ Registry ============

/// Decodes one `<ResourceRecord>` element into a [`Record`].
pub type RecordDecoder = fn(&XmlElement) -> Result<Record>;

fn decode_as<R>(element: &XmlElement) -> Result<Record>
where
    R: RecordCodec + Into<Record>,
{
    R::decode(element).map(Into::into)
}

const RECORD_DECODERS: &[(&str, RecordDecoder)] = &[
    (Soa::RECORD_TYPE, decode_as::<Soa>),
    (Ns::RECORD_TYPE, decode_as::<Ns>),
    (Cname::RECORD_TYPE, decode_as::<Cname>),
];

/// Looks up the decoder registered for a DNS type tag.
pub fn decoder_for(record_type: &str) -> Option<RecordDecoder> {
    RECORD_DECODERS
        .iter()
        .find(|(tag, _)| *tag == record_type)
        .map(|(_, decode)| *decode)
}

/// Type tags with a registered decoder.
pub fn supported_record_types() -> impl Iterator<Item = &'static str> {
    RECORD_DECODERS.iter().map(|(tag, _)| *tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> Name {
        Name::new(text).unwrap()
    }

    fn resource_record(value: &str) -> XmlElement {
        XmlElement::new("ResourceRecord").with_child(XmlElement::leaf("Value", value))
    }

    fn sample_soa() -> Soa {
        Soa {
            mname: name("1.awsdns-1.net."),
            rname: name("awsdns-hostmaster.amazon.com."),
            serial: 1,
            refresh: 7200,
            retry: 900,
            expire: 1_209_600,
            minimum: 86400,
        }
    }

    #[test]
    fn soa_encode_field_order() {
        assert_eq!(
            sample_soa().encode(),
            "1.awsdns-1.net. awsdns-hostmaster.amazon.com. 1 7200 900 1209600 86400"
        );
    }

    #[test]
    fn soa_round_trip_through_element() {
        let soa = sample_soa();
        let decoded = Soa::decode(&resource_record(&soa.encode())).unwrap();
        assert_eq!(decoded, soa);
    }

    #[test]
    fn soa_round_trip_with_extreme_values() {
        let soa = Soa {
            mname: name("bücher.example."),
            rname: name("hostmaster.bücher.example."),
            serial: u32::MAX,
            refresh: 0,
            retry: 0,
            expire: u32::MAX,
            minimum: 0,
        };
        let decoded = Soa::decode(&resource_record(&soa.encode())).unwrap();
        assert_eq!(decoded, soa);
    }

    #[test]
    fn soa_tolerates_extra_whitespace() {
        let soa = Soa::parse_value("  a.  b.\t1 2\n3 4   5 ").unwrap();
        assert_eq!(soa.mname, name("a."));
        assert_eq!(soa.minimum, 5);
    }

    #[test]
    fn soa_wrong_field_count() {
        for value in ["a. b. 1 2 3 4", "a. b. 1 2 3 4 5 6", ""] {
            let err = Soa::parse_value(value).unwrap_err();
            assert!(
                matches!(&err, Route53Error::MalformedRecord { record_type, .. } if record_type == "SOA"),
                "unexpected error for {value:?}: {err:?}"
            );
        }
    }

    #[test]
    fn soa_non_integer_field() {
        for value in [
            "a. b. one 2 3 4 5",
            "a. b. 1 2 3 4 -5",
            "a. b. 1 2 3 4 4294967296",
        ] {
            assert!(
                matches!(
                    Soa::parse_value(value),
                    Err(Route53Error::MalformedRecord { .. })
                ),
                "accepted {value:?}"
            );
        }
    }

    #[test]
    fn missing_value_is_malformed_record() {
        let element = XmlElement::new("ResourceRecord");
        assert!(matches!(
            Ns::decode(&element),
            Err(Route53Error::MalformedRecord { .. })
        ));
        let element = XmlElement::new("ResourceRecord").with_child(XmlElement::new("Value"));
        assert!(matches!(
            Cname::decode(&element),
            Err(Route53Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn ns_and_cname_round_trip() {
        let ns = Ns {
            nameserver: name("ns-1.awsdns-1.net."),
        };
        assert_eq!(Ns::decode(&resource_record(&ns.encode())).unwrap(), ns);

        let cname = Cname {
            canonical_name: name("somewhere.example.invalid."),
        };
        assert_eq!(
            Cname::decode(&resource_record(&cname.encode())).unwrap(),
            cname
        );
    }

    #[test]
    fn text_form_matches_wire_value() {
        let soa: Soa = "a. b. 1 2 3 4 5".parse().unwrap();
        assert_eq!(soa.to_string(), "a. b. 1 2 3 4 5");
        let ns: Ns = " ns1.example. ".parse().unwrap();
        assert_eq!(ns.to_string(), "ns1.example.");
        assert!("".parse::<Cname>().is_err());
        assert_eq!(Record::from(ns).to_string(), "ns1.example.");
    }

    #[test]
    fn unicode_targets_encode_as_idna() {
        let cname = Cname {
            canonical_name: name("bücher.example."),
        };
        assert_eq!(cname.encode(), "xn--bcher-kva.example.");
    }

    #[test]
    fn registry_dispatches_by_type_tag() {
        let element = resource_record("ns-2.awsdns-2.net.");

        let ns = decoder_for("NS").unwrap()(&element).unwrap();
        assert_eq!(ns.record_type(), "NS");
        assert_eq!(ns.encode(), "ns-2.awsdns-2.net.");

        let cname = decoder_for("CNAME").unwrap()(&element).unwrap();
        assert_eq!(cname.record_type(), "CNAME");
        assert_ne!(ns, cname);

        assert!(decoder_for("SOA").unwrap()(&element).is_err());
    }

    #[test]
    fn registry_has_no_unknown_types() {
        assert!(decoder_for("MX").is_none());
        assert!(decoder_for("ns").is_none());
        assert_eq!(
            supported_record_types().collect::<Vec<_>>(),
            ["SOA", "NS", "CNAME"]
        );
    }
}
