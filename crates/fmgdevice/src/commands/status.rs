//! FortiManager status handler.

use std::fmt::Write as _;

use fmgdevice_core::{Provider, ProviderConfig, SystemStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn status_detail(status: &SystemStatus) -> String {
    let rows = [
        ("Hostname", &status.hostname),
        ("Version", &status.version),
        ("Serial", &status.serial_number),
        ("Platform", &status.platform_type),
        ("ADOMs", &status.admin_domain_configuration),
    ];
    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<10} {}", value.as_deref().unwrap_or("-"));
    }
    out.trim_end().to_owned()
}

pub async fn handle(config: ProviderConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let pb = output::spinner(global, "Querying FortiManager");
    let result = Provider::oneshot(config, |provider| async move {
        provider.system_status().await
    })
    .await;
    pb.finish_and_clear();
    let status = result?;

    let out = output::render_single(&global.output, &status, status_detail, |s| {
        s.hostname.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
