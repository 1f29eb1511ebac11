use anyhow::Result;
use bytes::Bytes;
use tezrpc::endpoints::{
    Delegate, DelegateBalanceInput, DelegateDeactivatedInput, DelegateDelegatedContractsInput,
    DelegateFrozenBalanceByCycleInput, DelegateInput, DelegatesInput, FrozenBalanceByCycle,
    StakingBalanceInput,
};

use crate::support::{
    fixtures::FixtureRegistry,
    helpers::{assert_err_contains, client_for, init_tracing, MOCK_BLOCK_HASH},
    mock_rpc::{Fallback, MockRouter, MockRpcServer},
};

const BAKER: &str = "tz1SUgyRB8T5jXgXAwS33pgRHAKrafyg87Yc";
const TZ1: &str = "tz1U8sXoQWGUMQrfZeAYwAzMZUvWwy7mfpPQ";

async fn serve(pattern: &str, body: impl Into<Bytes>) -> Result<MockRpcServer> {
    init_tracing();
    let router = MockRouter::new(Fallback::Blank).route(pattern, [body.into()]);
    MockRpcServer::start(router).await
}

#[tokio::test]
async fn delegate_handles_rpc_failure() -> Result<()> {
    let fixtures = FixtureRegistry::load()?;
    let server = serve(r"/context/delegates/[^/]+$", fixtures.get("rpcerrors")).await?;
    let client = client_for(&server)?;

    let result = client
        .delegate(DelegateInput::new(MOCK_BLOCK_HASH, BAKER))
        .await;
    assert_err_contains(result, &format!("failed to get delegate '{BAKER}'"));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn delegate_handles_junk() -> Result<()> {
    let server = serve(r"/context/delegates/[^/]+$", "junk").await?;
    let client = client_for(&server)?;

    let result = client
        .delegate(DelegateInput::new(MOCK_BLOCK_HASH, BAKER))
        .await;
    assert_err_contains(
        result,
        &format!("failed to get delegate '{BAKER}': failed to parse json"),
    );

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn delegate_decodes_fixture() -> Result<()> {
    let fixtures = FixtureRegistry::load()?;
    let server = serve(r"/context/delegates/[^/]+$", fixtures.get("delegate")).await?;
    let client = client_for(&server)?;

    let delegate = client
        .delegate(DelegateInput::new(MOCK_BLOCK_HASH, BAKER))
        .await?;

    assert_eq!(delegate, fixtures.decode::<Delegate>("delegate"));
    assert_eq!(delegate.frozen_balance_by_cycle[1].rewards, 5_451_875_000);
    assert_eq!(delegate.grace_period, 305);
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn delegate_balance_scenarios() -> Result<()> {
    let fixtures = FixtureRegistry::load()?;
    let router = MockRouter::new(Fallback::Blank).route(
        r"/context/delegates/[^/]+/balance$",
        [fixtures.get("rpcerrors"), Bytes::from_static(b"junk"), fixtures.get("balance")],
    );
    init_tracing();
    let server = MockRpcServer::start(router).await?;
    let client = client_for(&server)?;
    let input = DelegateBalanceInput::new(MOCK_BLOCK_HASH, TZ1);

    assert_err_contains(
        client.delegate_balance(input.clone()).await,
        &format!("failed to get delegate '{TZ1}' balance"),
    );
    assert_err_contains(
        client.delegate_balance(input.clone()).await,
        &format!("failed to get delegate '{TZ1}' balance: failed to parse json"),
    );
    assert_eq!(client.delegate_balance(input.clone()).await?, "1216660108948");
    // The last queued body keeps being served.
    assert_eq!(client.delegate_balance(input).await?, "1216660108948");
    assert_eq!(server.hits(), 4);

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn delegate_deactivated_decodes_bool() -> Result<()> {
    let server = serve(r"/deactivated$", "true").await?;
    let client = client_for(&server)?;

    let deactivated = client
        .delegate_deactivated(DelegateDeactivatedInput::new(MOCK_BLOCK_HASH, BAKER))
        .await?;
    assert!(deactivated);
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn delegated_contracts_and_frozen_balance_by_cycle() -> Result<()> {
    let fixtures = FixtureRegistry::load()?;
    init_tracing();
    let router = MockRouter::new(Fallback::Unhandled)
        .route(
            r"/delegated_contracts$",
            [Bytes::from_static(br#"["KT1LinsZAnyxajEv4eNFRtwVKgdd2HoFQJST"]"#)],
        )
        .route(
            r"/frozen_balance_by_cycle$",
            [fixtures.get("frozen_balance_by_cycle")],
        );
    let server = MockRpcServer::start(router).await?;
    let client = client_for(&server)?;

    let contracts = client
        .delegate_delegated_contracts(DelegateDelegatedContractsInput::new(MOCK_BLOCK_HASH, BAKER))
        .await?;
    assert_eq!(contracts, vec!["KT1LinsZAnyxajEv4eNFRtwVKgdd2HoFQJST".to_owned()]);

    let by_cycle = client
        .delegate_frozen_balance_by_cycle(DelegateFrozenBalanceByCycleInput::new(
            MOCK_BLOCK_HASH,
            BAKER,
        ))
        .await?;
    assert_eq!(
        by_cycle,
        fixtures.decode::<Vec<FrozenBalanceByCycle>>("frozen_balance_by_cycle")
    );
    assert!(server.router().unhandled().is_empty());

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn delegates_sends_activity_filter() -> Result<()> {
    let server = serve(r"/context/delegates$", format!(r#"["{BAKER}"]"#)).await?;
    let client = client_for(&server)?;

    let delegates = client
        .delegates(DelegatesInput {
            blockhash: MOCK_BLOCK_HASH.into(),
            active: true,
            inactive: false,
        })
        .await?;

    assert_eq!(delegates, vec![BAKER.to_owned()]);
    let requests = server.router().requests();
    assert_eq!(requests[0].query.as_deref(), Some("active=true"));
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn staking_balance_at_block() -> Result<()> {
    let server = serve(r"/staking_balance$", r#""16981852416453""#).await?;
    let client = client_for(&server)?;

    let balance = client
        .staking_balance(StakingBalanceInput {
            blockhash: MOCK_BLOCK_HASH.into(),
            cycle: 0,
            delegate: BAKER.into(),
        })
        .await?;

    assert_eq!(balance, 16_981_852_416_453);
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn staking_balance_validation_sends_nothing() -> Result<()> {
    let server = serve(r"/staking_balance$", r#""1""#).await?;
    let client = client_for(&server)?;

    let neither = client
        .staking_balance(StakingBalanceInput {
            delegate: BAKER.into(),
            ..Default::default()
        })
        .await;
    assert_err_contains(neither, "invalid input: missing key cycle or blockhash");

    let both = client
        .staking_balance(StakingBalanceInput {
            blockhash: MOCK_BLOCK_HASH.into(),
            cycle: 100,
            delegate: BAKER.into(),
        })
        .await;
    assert_err_contains(both, "invalid input: cannot have both cycle and blockhash");

    let no_delegate = client
        .staking_balance(StakingBalanceInput {
            blockhash: MOCK_BLOCK_HASH.into(),
            ..Default::default()
        })
        .await;
    assert_err_contains(no_delegate, "could not get staking balance for ''");

    assert_eq!(server.hits(), 0);
    server.shutdown().await;
    Ok(())
}
