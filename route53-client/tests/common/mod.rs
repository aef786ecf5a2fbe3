//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use route53_client::{
    Credentials, Name, PreparedRequest, RawResponse, RequestSigner, Result, Route53Client,
    Route53Error, SignedRequest, Transport, new_caller_reference,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

// ============ In-memory transport ============

/// 记录所有请求并按顺序回放预设响应的 Transport
#[derive(Default)]
pub struct MemoryTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<SignedRequest>>,
}

impl MemoryTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 追加一个响应
    pub fn respond(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    /// 追加一个传输层错误
    pub fn fail(&self, error: Route53Error) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// 已发送的请求
    pub fn requests(&self) -> Vec<SignedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// 最后一个请求
    pub fn last_request(&self) -> SignedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn execute(&self, request: &SignedRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned response left")
    }
}

/// 不做签名，只回显内容哈希，便于断言
pub struct EchoSigner;

impl RequestSigner for EchoSigner {
    fn sign(&self, request: &PreparedRequest) -> Result<Vec<(String, String)>> {
        Ok(vec![(
            "x-amz-content-sha256".to_string(),
            request.content_sha256.clone(),
        )])
    }
}

/// 使用内存 Transport 的客户端
pub fn memory_client() -> (Route53Client, Arc<MemoryTransport>) {
    let transport = MemoryTransport::new();
    let client = Route53Client::builder(Credentials::new("AKIDEXAMPLE", "secret"))
        .transport(transport.clone())
        .build()
        .expect("client should build");
    (client, transport)
}

/// 同上，但替换签名器
pub fn memory_client_with_signer(
    signer: Arc<dyn RequestSigner>,
) -> (Route53Client, Arc<MemoryTransport>) {
    let transport = MemoryTransport::new();
    let client = Route53Client::builder(Credentials::new("AKIDEXAMPLE", "secret"))
        .transport(transport.clone())
        .signer(signer)
        .build()
        .expect("client should build");
    (client, transport)
}

pub fn name(text: &str) -> Name {
    Name::new(text).expect("valid name")
}

// ============ Live context ============

/// 测试上下文 - 封装真实客户端和测试域名
pub struct TestContext {
    pub client: Route53Client,
    pub domain: String,
}

impl TestContext {
    /// 从环境变量创建真实 AWS 上下文
    pub fn aws() -> Option<Self> {
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        let mut credentials = Credentials::new(access_key_id, secret_access_key);
        if let Ok(token) = env::var("AWS_SESSION_TOKEN") {
            credentials = credentials.with_session_token(token);
        }
        let client = Route53Client::new(credentials).ok()?;

        // 每次运行使用唯一的区域名称
        let suffix = &new_caller_reference()[..8];
        Some(Self {
            client,
            domain: format!("r53-test-{suffix}.example.com."),
        })
    }
}
