//! Application code written against `Connection` runs unchanged on the
//! client double and on the pool double.

use asupersync::runtime::RuntimeBuilder;
use nogres::prelude::*;
use regex::Regex;

async fn fetch_customer_names<C: Connection>(
    cx: &Cx,
    db: &C,
    customer_id: i64,
) -> Outcome<Vec<String>, Error> {
    let statement = Statement::from("SELECT firstname, lastname FROM customer WHERE id = $1");
    let result = match db.query(cx, statement, Params::from([customer_id])).await {
        Outcome::Ok(result) => result,
        Outcome::Err(e) => return Outcome::Err(e),
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    };

    let names = result
        .rows
        .iter()
        .map(|row| {
            let first = row.get("firstname").and_then(Value::as_str).unwrap_or_default();
            let last = row.get("lastname").and_then(Value::as_str).unwrap_or_default();
            format!("{first} {last}")
        })
        .collect();
    Outcome::Ok(names)
}

fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

fn customer_pattern() -> Regex {
    Regex::new(r"(?i)SELECT firstname, lastname FROM customer WHERE id = \$1")
        .expect("valid pattern")
}

#[test]
fn fetch_customer_with_client() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let client = MockClient::new();
        client
            .expect_with(
                customer_pattern(),
                [2_i64],
                Row::from_pairs([("firstname", "Jayne"), ("lastname", "Cobb")]),
            )
            .unwrap();

        unwrap_outcome(Connection::connect(&client, &cx).await);
        let names = unwrap_outcome(fetch_customer_names(&cx, &client, 2).await);
        client.done().unwrap();

        assert_eq!(names, vec!["Jayne Cobb".to_string()]);
    });
}

#[test]
fn fetch_customer_with_pool() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let pool = MockPool::new();
        pool.expect_with(
            customer_pattern(),
            [2_i64],
            Row::from_pairs([("firstname", "Jayne"), ("lastname", "Cobb")]),
        )
        .unwrap();

        let names = unwrap_outcome(fetch_customer_names(&cx, &pool, 2).await);
        pool.done().unwrap();
        assert_eq!(names, vec!["Jayne Cobb".to_string()]);
        pool.end_with(|| ());
    });
}

#[test]
fn fetch_customer_surfaces_param_mismatch() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let pool = MockPool::new();
        pool.expect(customer_pattern(), [2_i64]).unwrap();

        match fetch_customer_names(&cx, &pool, 3).await {
            Outcome::Err(Error::UnexpectedParams { expected, actual, .. }) => {
                assert_eq!(expected, "[2]");
                assert_eq!(actual, "[3]");
            }
            Outcome::Err(e) => panic!("unexpected error: {e}"),
            Outcome::Ok(v) => panic!("expected a mismatch, got {v:?}"),
            Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
            Outcome::Panicked(p) => panic!("panicked: {p:?}"),
        }
    });
}
