pub mod dispatcher;
pub mod error;
pub mod report;

pub use dispatcher::{AnalysisRequest, AnalysisResult, Analyzer, AnalyzerBuilder};
pub use error::AnalysisError;
pub use report::{InfluenceReport, ResponseEntry};
