use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use log::info;

use crate::auth::Token;
use crate::error::{Result, SonarEvidenceError};
use crate::evidence::ScanEvidence;
use crate::report;
use crate::sonar::client::{SonarClient, ANALYSIS_URL};

const DEFAULT_REPORT_TASK_FILE: &str = ".scannerwork/.report-task.txt";
const DEFAULT_LOG_FILE: &str = "sonar-scan.log";

#[derive(Parser)]
#[command(name = "sonar-evidence")]
#[command(version, about = "Extracts SonarQube quality gate evidence after a scan", long_about = None)]
pub struct Cli {
    /// Report-task file written by the scanner
    #[arg(default_value = DEFAULT_REPORT_TASK_FILE)]
    report_task: PathBuf,

    /// SonarQube bearer token
    #[arg(long, env = "SONAR_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Quality gate endpoint template; `$analysisId` is substituted per run
    #[arg(long, default_value = ANALYSIS_URL)]
    analysis_url: String,

    /// Overall deadline for the remote calls, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Append-only diagnostic log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Cli {
    /// Run the extraction pipeline and write the evidence document to stdout.
    ///
    /// Stdout receives either the complete JSON object or nothing at all;
    /// diagnostics go to the log sink only.
    pub async fn execute(&self) -> Result<()> {
        let json = self.collect_evidence().await?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    /// ReadPointer -> FetchTask -> FetchAnalysis -> Assemble, under one
    /// deadline. Each stage runs once; the first failure is terminal.
    async fn collect_evidence(&self) -> Result<String> {
        let deadline = Instant::now() + Duration::from_secs(self.timeout);

        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                SonarEvidenceError::Config(
                    "Sonar token not found, set SONAR_TOKEN variable".to_owned(),
                )
            })?;

        let task_url = report::ce_task_url(&self.report_task)?;

        let client =
            SonarClient::new(Token::from(token))?.with_analysis_url(self.analysis_url.clone());

        let task = client.fetch_task(&task_url, deadline).await?;
        info!("Task {} resolved analysis id: {}", task.id, task.analysis_id);

        let analysis = client.fetch_quality_gate(&task.analysis_id, deadline).await?;
        info!("Quality gate status: {}", analysis.status);

        ScanEvidence::new(task, analysis).to_json()
    }
}
