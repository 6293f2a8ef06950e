use reports_store::common::init;
use reports_store::settings::AppSettings;
use reports_store::workers::ensure_schema;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::load_from_env()?;
    init::initialize_logging(&settings);
    match settings.app_component.as_str() {
        "ensure-schema" => ensure_schema::serve(&settings).await,
        other => anyhow::bail!("Unknown app component: {other}"),
    }
}
