//! `xz-pack check` - packing self-test

use anyhow::Result;

use assets_common::packing::{PROBE_INT, PROBE_STRING, compatibility_report};

pub fn execute() -> Result<()> {
    let report = compatibility_report();

    let hex = |bytes: &[u8]| {
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ")
    };

    println!("Name packing: {:?}", PROBE_STRING);
    println!("  {}", hex(&report.packed_string));
    println!("  one byte per character: {}", report.string_is_ascii);
    println!("Integer packing: {:#010x}", PROBE_INT);
    println!("  {}", hex(&report.packed_int));
    println!("  little-endian: {}", report.int_is_little_endian);

    if !report.string_is_ascii || !report.int_is_little_endian {
        anyhow::bail!("Packing does not match the firmware layout");
    }

    println!();
    println!("Packing matches the firmware layout");
    Ok(())
}
