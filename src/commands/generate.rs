//! Generate static post pages

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Enumerate every post and pre-render it
pub fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let paths = blog.static_paths()?;
    let generator = Generator::new(blog)?;
    let count = generator.generate(&paths)?;

    let duration = start.elapsed();
    tracing::info!("Generated {} posts in {:.2}s", count, duration.as_secs_f64());

    Ok(())
}
