use clap::Parser;
use pottery_client::DEFAULT_BASE_URL;
use pottery_model::Field;
use pottery_observe::LoggerFormat;

#[derive(Debug, Parser)]
#[command(name = "pottery", version, about = "Interactive client for a pottery server")]
pub struct Args {
    /// API root of the pottery server.
    #[arg(long, env = "POTTERY_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log filter directive (`info`, `pottery_client=debug,warn`, ...).
    #[arg(long, env = "POTTERY_LOG", default_value = "warn")]
    pub log_level: String,

    #[arg(long, env = "POTTERY_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Preset a field before the console starts; repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_preset)]
    pub presets: Vec<(Field, String)>,
}

fn parse_preset(s: &str) -> Result<(Field, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {s:?}"))?;
    let field = field.parse::<Field>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}
