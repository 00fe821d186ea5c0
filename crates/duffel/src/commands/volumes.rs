//! Volumes command

use anyhow::Result;

use crate::cli::VolumesArgs;
use crate::output;
use crate::volumes;

pub async fn run(args: VolumesArgs) -> Result<()> {
    let volumes = volumes::enumerate()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&volumes)?);
        return Ok(());
    }

    output::header("Destination Volumes");

    if volumes.is_empty() {
        output::warning("No external volumes detected");
        output::info("Connect a volume, or pass --destination to `duffel backup`");
        return Ok(());
    }

    for (index, volume) in volumes.iter().enumerate() {
        output::numbered(index + 1, &volume.describe());
    }

    Ok(())
}
