use rentahuman_mcp::run_server;

#[tokio::test]
async fn server_starts_with_defaults() {
    std::env::set_var("RENTAHUMAN_HEADLESS", "1");
    let result = run_server().await;
    assert!(
        result.is_ok(),
        "expected headless server start to succeed: {result:?}"
    );
}
