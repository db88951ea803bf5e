use anyhow::Result;
use vergen::EmitBuilder;

// Exposes VERGEN_GIT_SHA and VERGEN_BUILD_DATE to the CLI version string.
fn main() -> Result<()> {
    EmitBuilder::builder()
        .build_date()
        .git_sha(true)
        .emit()?;
    Ok(())
}
