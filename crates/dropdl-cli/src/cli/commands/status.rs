//! `dropdl status` – show manifest/archive/cookie state.

use anyhow::Result;
use dropdl_core::layout::RunLayout;
use dropdl_core::status::StatusReport;

pub fn run_status(layout: &RunLayout, json: bool) -> Result<()> {
    let report = StatusReport::gather(layout)?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("Output dir:  {}", report.output_dir);
    println!("Config dir:  {}", report.config_dir);
    println!(
        "Cookies:     {}",
        if report.cookies_present {
            "present"
        } else {
            "MISSING (required for downloads)"
        }
    );
    match report.archive_entries {
        Some(n) => println!("Archive:     {} downloaded item(s) recorded", n),
        None => println!("Archive:     not created yet"),
    }
    match report.manifest_urls {
        Some(n) => println!("Manifest:    {} episode URL(s)", n),
        None => println!("Manifest:    no crawl recorded"),
    }
    Ok(())
}
