//! Route53 integration test against the live service
//!
//! Operation mode:
//! ```bash
//! AWS_ACCESS_KEY_ID=xxx AWS_SECRET_ACCESS_KEY=xxx \
//!     cargo test -p route53-client --test aws_test -- --ignored --nocapture --test-threads=1
//! ```
//!
//! The test creates a throwaway hosted zone and deletes it again.

mod common;

use common::{TestContext, name};
use route53_client::{
    Cname, ListRecordSetsParams, Name, Record, create_rrset, delete_rrset, new_caller_reference,
};

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY"]
async fn test_aws_list_hosted_zones() {
    skip_if_no_credentials!("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY");

    let ctx = require_some!(TestContext::aws(), "创建测试上下文失败");
    let zones = require_ok!(
        ctx.client.list_hosted_zones().await,
        "list_hosted_zones 调用失败"
    );
    for zone in &zones {
        assert!(!zone.identifier.starts_with("/hostedzone/"));
    }

    println!("✓ list_hosted_zones 测试通过，共 {} 个区域", zones.len());
}

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY"]
async fn test_aws_zone_lifecycle() {
    skip_if_no_credentials!("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY");

    let ctx = require_some!(TestContext::aws(), "创建测试上下文失败");
    let apex = require_ok!(Name::new(ctx.domain.as_str()));

    // 1. 创建
    let zone = require_ok!(
        ctx.client
            .create_hosted_zone(&new_caller_reference(), &apex)
            .await,
        "create_hosted_zone 调用失败"
    );
    println!("✓ 创建区域: {} ({})", zone.name, zone.identifier);

    // 2. 添加 CNAME
    let www = name(&format!("www.{}", ctx.domain));
    let target = Cname {
        canonical_name: apex.clone(),
    };
    let created = ctx
        .client
        .change_resource_record_sets(
            &zone.identifier,
            &[create_rrset(www.clone(), "CNAME", [target.clone()])],
        )
        .await;

    // 3. 列出记录
    let listed = ctx
        .client
        .list_resource_record_sets(&zone.identifier, &ListRecordSetsParams::default())
        .await;

    // 4. 清理（无论上面是否成功）
    if created.is_ok() {
        let _ = ctx
            .client
            .change_resource_record_sets(
                &zone.identifier,
                &[delete_rrset(www.clone(), "CNAME", [target.clone()])],
            )
            .await;
    }
    let deleted = ctx.client.delete_hosted_zone(&zone.identifier).await;

    require_ok!(created, "change_resource_record_sets 调用失败");
    let sets = require_ok!(listed, "list_resource_record_sets 调用失败");
    let records = require_some!(sets.get(&www), "找不到新建的 CNAME");
    assert!(records.contains(&Record::from(target)));
    assert!(
        sets.get(&apex)
            .is_some_and(|r| r.iter().any(|rec| rec.record_type() == "SOA")),
        "区域顶点应该有 SOA"
    );
    require_ok!(deleted, "delete_hosted_zone 调用失败");

    println!("✓ 区域生命周期测试通过");
}
