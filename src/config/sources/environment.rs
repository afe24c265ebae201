//! Environment source: CLONEKIT_<SECTION>__<KEY>

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

/// Add `CLONEKIT_*` overrides; role lists are comma-separated.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("CLONEKIT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("registry.admins")
            .with_list_parse_key("registry.factory_operators")
            .with_list_parse_key("registry.allowlist_admins"),
    ))
}
