pub mod analysis;

pub use analysis::{render_analysis_prompt, ANALYST_SYSTEM_INSTRUCTION};
