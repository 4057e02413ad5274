use clap::{Parser, Subcommand};
use ecg_core::config::{
    predict_url_from_env_value, report_dir_from_env_value, request_timeout_from_env_value,
};
use ecg_core::{
    ContactForm, CoreConfig, DiagnosisDraft, DiagnosisForm, DirectorySink, EcgError, Gender,
    ImageUpload, PredictionClient, Route,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ecg")]
#[command(about = "ECG diagnosis front-end CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an ECG image for diagnosis and save the PDF report
    Diagnose {
        /// Patient name
        name: String,
        /// Patient age
        age: String,
        /// Patient gender (male, female, other)
        gender: String,
        /// ECG image file
        image: PathBuf,
        /// Directory to save the report into (default: $ECG_REPORT_DIR or ".")
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Prediction endpoint (default: $ECG_PREDICT_URL)
        #[arg(long)]
        endpoint: Option<String>,
        /// Request timeout in seconds, 0 for none (default: $ECG_REQUEST_TIMEOUT_SECS)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Check a contact form submission locally
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        message: String,
        /// Allow the site to store the submission
        #[arg(long)]
        consent: bool,
    },
    /// List the site's pages
    Routes,
}

fn resolve_config(
    out_dir: Option<PathBuf>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<CoreConfig, EcgError> {
    let predict_url =
        predict_url_from_env_value(endpoint.or_else(|| std::env::var("ECG_PREDICT_URL").ok()))?;
    let request_timeout = match timeout_secs {
        Some(secs) => (secs > 0).then(|| Duration::from_secs(secs)),
        None => request_timeout_from_env_value(std::env::var("ECG_REQUEST_TIMEOUT_SECS").ok())?,
    };
    let report_dir =
        out_dir.unwrap_or_else(|| report_dir_from_env_value(std::env::var("ECG_REPORT_DIR").ok()));
    CoreConfig::new(predict_url, request_timeout, report_dir)
}

/// Print the message a user should see for `error`, falling back to its detail.
fn report_failure(error: &EcgError) {
    match error.user_message() {
        Some(message) => eprintln!("{message}"),
        None => eprintln!("Error: {error}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("ecg=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Diagnose {
            name,
            age,
            gender,
            image,
            out_dir,
            endpoint,
            timeout_secs,
        }) => {
            let cfg = resolve_config(out_dir, endpoint, timeout_secs)?;

            let mut draft = DiagnosisDraft::new();
            draft.set_name(&name);
            draft.set_age(&age);
            match Gender::from_field(&gender) {
                Ok(gender) => draft.set_gender(gender),
                Err(e) => {
                    report_failure(&e);
                    std::process::exit(1);
                }
            }
            match ImageUpload::from_path(&image) {
                Ok(upload) => draft.set_image(Some(upload)),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }

            let client = PredictionClient::new(&cfg)?;
            let sink = DirectorySink::new(cfg.report_dir());
            let form = DiagnosisForm::with_draft(draft);
            match form.submit(&client, &sink).await {
                Ok(path) => println!("Saved report to {}", path.display()),
                Err(e) => {
                    report_failure(&e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Contact {
            name,
            email,
            phone,
            message,
            consent,
        }) => {
            let form = ContactForm {
                name,
                email,
                phone,
                message,
                consent,
            };
            match form.submit() {
                Ok(ack) => println!("{}", ack.message),
                Err(e) => {
                    report_failure(&e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Routes) => {
            for route in Route::ALL {
                match route.call_to_action() {
                    Some(cta) => println!(
                        "{:<14} {:<14} -> {} ({})",
                        route.path(),
                        route.label(),
                        cta.target.path(),
                        cta.label
                    ),
                    None => println!("{:<14} {}", route.path(), route.label()),
                }
            }
        }
        None => {
            println!("Use 'ecg --help' for commands");
        }
    }

    Ok(())
}
