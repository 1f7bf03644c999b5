use std::{error::Error, fs, path::Path};

use log::info;
use scmtools_formats::registry::CodecRegistry;

use crate::{map_file, write_options};

pub fn repack(
    input: &Path,
    output: &Path,
    alignment: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    let options = write_options(alignment)?;

    let data = map_file(input)?;
    let codec = CodecRegistry::default().detect(input, &data)?;
    let mesh = codec.decode(&data)?;
    let bytes = codec.encode(&mesh, &options)?;

    fs::write(output, &bytes)?;

    info!(
        "Repacked {} ({} bytes) into {} ({} bytes)",
        input.display(),
        data.len(),
        output.display(),
        bytes.len()
    );

    Ok(())
}
