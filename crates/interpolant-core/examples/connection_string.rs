use interpolant_core::prelude::*;
use interpolant_core::interpolate;
use serde_json::json;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("Interpolant demo");
    println!("----------------");

    // Marked keys keep long argument lists readable.
    let mut db = Interpolator::init(&[
        json!("host ->"), json!("db.internal"),
        json!("port ->"), json!(5432),
        json!("user ->"), json!("app"),
    ])?;

    let url = "postgres://${user}:${password: changeme}@${host}:${port}/${database}";
    println!("{}", db.render(url));

    db.add(&[json!("database"), json!("orders")])?;
    println!("{}", db.render(url));

    db.del(["user"]);
    println!("{}", db.render(url));

    println!("{}", interpolate!("${greeting}, ${name: stranger}!", "Hello"));

    Ok(())
}
