use anyhow::Result;
use tezrpc::endpoints::{BlockId, BlocksInput, Checkpoint, Version};

use crate::support::{
    fixtures::FixtureRegistry,
    helpers::{assert_err_contains, client_for, init_tracing, MOCK_BLOCK_HASH},
    mock_rpc::{Fallback, MockRouter, MockRpcServer},
};

#[tokio::test]
async fn head_and_block_by_level() -> Result<()> {
    init_tracing();
    let fixtures = FixtureRegistry::load()?;
    let router = MockRouter::new(Fallback::Unhandled)
        .route(r"^/chains/main/blocks/head$", [fixtures.get("block")])
        .route(r"^/chains/main/blocks/[0-9]+$", [fixtures.get("block")]);
    let server = MockRpcServer::start(router).await?;
    let client = client_for(&server)?;

    let head = client.head().await?;
    assert_eq!(head.hash, MOCK_BLOCK_HASH);
    assert_eq!(head.cycle(), Some(294));

    let block = client.block(BlockId::Level(1_207_295)).await?;
    assert_eq!(block.level(), 1_207_295);

    assert_err_contains(
        client.block(MOCK_BLOCK_HASH).await,
        &format!("failed to get block '{MOCK_BLOCK_HASH}'"),
    );
    assert_eq!(
        server.router().unhandled(),
        vec![format!("/chains/main/blocks/{MOCK_BLOCK_HASH}")]
    );
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn chain_scoped_resources() -> Result<()> {
    init_tracing();
    let fixtures = FixtureRegistry::load()?;
    let router = MockRouter::new(Fallback::Unhandled)
        .route(r"^/chains/main/chain_id$", ["\"NetXdQprcVkpaWU\""])
        .route(r"^/chains/main/checkpoint$", [fixtures.get("checkpoint")])
        .route(
            r"^/chains/main/invalid_blocks$",
            [r#"[{"block":"BLzGD63HA4RP8Fh5xEtvdQSMKa2WzJMZjQPNVUc4Rqy8Lh5BEY1","level":1000,"errors":[{"kind":"permanent","id":"proto.alpha.baking.timestamp_too_early"}]}]"#],
        )
        .route(
            r"^/chains/main/blocks$",
            [format!(r#"[["{MOCK_BLOCK_HASH}","BMZ1xjJBFCyaC9hTuWvHAUW2gMQNwd6GJLxXtnSeF9m3bvHyRS8"]]"#)],
        );
    let server = MockRpcServer::start(router).await?;
    let client = client_for(&server)?;

    assert_eq!(client.chain_id().await?, "NetXdQprcVkpaWU");

    let checkpoint = client.checkpoint().await?;
    assert_eq!(checkpoint, fixtures.decode::<Checkpoint>("checkpoint"));

    let invalid = client.invalid_blocks().await?;
    assert_eq!(invalid[0].level, 1000);
    assert_eq!(invalid[0].errors[0].kind, "permanent");

    let blocks = client
        .blocks(BlocksInput {
            length: 2,
            ..Default::default()
        })
        .await?;
    assert_eq!(blocks[0].len(), 2);
    let requests = server.router().requests();
    assert_eq!(requests.last().and_then(|r| r.query.clone()), Some("length=2".to_owned()));

    client
        .blocks(BlocksInput {
            length: 1,
            head: vec!["BLa".into(), "BLb".into()],
            ..Default::default()
        })
        .await?;
    let requests = server.router().requests();
    assert_eq!(
        requests.last().and_then(|r| r.query.clone()),
        Some("length=1&head=BLa&head=BLb".to_owned())
    );
    assert!(server.router().unhandled().is_empty());

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn node_scoped_resources_skip_chain_segment() -> Result<()> {
    init_tracing();
    let fixtures = FixtureRegistry::load()?;
    let router = MockRouter::new(Fallback::Unhandled)
        .route(r"^/version$", [fixtures.get("version")])
        .route(r"^/monitor/active_chains$", [r#"[{"chain_id":"NetXdQprcVkpaWU"}]"#]);
    let server = MockRpcServer::start(router).await?;
    let client = client_for(&server)?;

    let version = client.version().await?;
    assert_eq!(version, fixtures.decode::<Version>("version"));

    let chains = client.active_chains().await?;
    assert_eq!(chains[0].chain_id.as_deref(), Some("NetXdQprcVkpaWU"));
    assert!(server.router().unhandled().is_empty());

    server.shutdown().await;
    Ok(())
}
