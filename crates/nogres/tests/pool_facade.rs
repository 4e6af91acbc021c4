use asupersync::runtime::RuntimeBuilder;
use nogres::prelude::*;

fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

#[test]
fn pool_runs_queries_with_the_underlying_client() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let pool = MockPool::new();
        let rows = vec![Row::new().with("id", 1), Row::new().with("id", 2)];
        pool.expect_with("SELECT id FROM t", AnyParams, rows.clone())
            .unwrap();

        let result = unwrap_outcome(pool.query(&cx, "SELECT id FROM t", Params::none()).await);
        assert_eq!(result.rows, rows);
        assert_eq!(result.row_count, 2);

        // the expectation went through the pool's single client
        assert_eq!(pool.client().expectation_count(), 0);
        pool.done().unwrap();
    });
}

#[test]
fn pool_and_client_share_expectations() {
    let pool = MockPool::new();
    pool.expect("A", AnyParams).unwrap();
    pool.client().expect("B", AnyParams).unwrap();

    let patterns: Vec<String> = pool
        .expectations()
        .iter()
        .map(|e| e.pattern().to_string())
        .collect();
    assert_eq!(patterns, vec!["A", "B"]);

    pool.reset();
    assert_eq!(pool.client().expectation_count(), 0);
}

#[test]
fn pool_connect_callback_sees_client_state() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let pool = MockPool::new();
        let connected = pool
            .connect_with(&cx, |r| r.is_ok() && pool.client().is_connected())
            .await;
        assert!(connected);
    });
}

#[test]
fn pool_connect_error_reaches_future() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let pool = MockPool::with_config(MockConfig::new().connect_error("no route to host"));
        match pool.connect(&cx).await {
            Outcome::Err(e) => assert_eq!(e.to_string(), "no route to host"),
            Outcome::Ok(()) => panic!("connect should fail"),
            Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
            Outcome::Panicked(p) => panic!("panicked: {p:?}"),
        }
    });
}

#[test]
fn pool_end_is_a_no_op() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let pool = MockPool::new();
        unwrap_outcome(pool.connect(&cx).await);
        pool.expect("SELECT 1", AnyParams).unwrap();

        unwrap_outcome(pool.end(&cx).await);
        let value = pool.end_with(|| 42);
        assert_eq!(value, 42);

        // nothing was released: the client is still connected and primed
        assert!(pool.client().is_connected());
        assert_eq!(pool.expectation_count(), 1);
    });
}
