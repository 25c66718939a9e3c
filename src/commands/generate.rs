//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Generate the static site into the public directory
pub async fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let written = generator.generate().await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages in {:.2}s",
        written,
        duration.as_secs_f64()
    );

    Ok(())
}
