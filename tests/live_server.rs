//! Serve over a real socket and talk to it with the SDK client.

use std::time::Duration;

use aaz_dev_server::Shutdown;
use sdk_rust::{AazClient, ClientError};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_sdk_round_trip_and_graceful_shutdown() {
    let fx = common::fixture();
    let server = fx.server();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = AazClient::new(&format!("http://{}", addr));

    let profiles = client.profiles().await.unwrap();
    assert_eq!(profiles[0], "latest");

    let modules = client.list_modules("Main").await.unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0].name, "network");

    let ps_modules = client.ps_list_modules("Extension").await.unwrap();
    assert_eq!(ps_modules[0].name, "ssh");

    let node = client.get_node("aaz/ssh").await.unwrap();
    assert!(node["commands"]["vm"].is_object());

    let commands = client.portal_commands("Main", "network", None).await.unwrap();
    assert_eq!(commands[0]["name"], "az network vnet create");

    let report = client.verify("Main", Some(&["network"][..])).await.unwrap();
    assert_eq!(report["dry_run"], true);

    match client.get_module("Main", "absent").await {
        Err(ClientError::Api { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body.code, "NotFound");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let raw = client.get_raw("/CLI/Az/Profiles").await.unwrap();
    assert!(raw.headers().contains_key("x-request-id"));

    drop(raw);
    drop(client);
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop")
        .unwrap()
        .unwrap();
}
