//! VCF to HGVS conversion

use crate::app::{HgvsArgs, OutputFormat};
use anyhow::Result;
use biothings_core::variant::hgvs_from_vcf_file;

pub async fn run(args: HgvsArgs, format: OutputFormat) -> Result<()> {
    let ids = hgvs_from_vcf_file(&args.vcf)?;
    match format {
        OutputFormat::Json => {
            let ids = ids.collect::<biothings_core::Result<Vec<String>>>()?;
            println!("{}", serde_json::to_string_pretty(&ids)?);
        }
        _ => {
            for id in ids {
                println!("{}", id?);
            }
        }
    }
    Ok(())
}
