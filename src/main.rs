use foodai::app;
use foodai::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing();

    let state = AppState::init().await?;
    let report = app::run(state).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
