use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use narrative::{DetailLevel, DocumentType, Settings, SynthesisParameters};
use scribe::{Destination, generate, init_logging, read_notes, serve};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP interface
    Serve {
        /// Address to bind the HTTP server
        #[arg(long, env = "SCRIBE_ADDR", default_value = "127.0.0.1:3000")]
        addr: String,
    },
    /// Synthesize one document and print it to stdout
    Generate {
        /// discharge-summary, gp-letter, handover, consultant-update or referral
        #[arg(long, short = 't', default_value = "discharge-summary")]
        document_type: DocumentType,
        /// concise, standard or comprehensive
        #[arg(long, short = 'd', default_value = "standard")]
        detail_level: DetailLevel,
        /// File containing the clinical notes, or `-` for stdin
        #[arg(long, short = 'n', default_value = "-")]
        notes: PathBuf,
        /// Also write the draft to this file
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
        /// Also write the draft to a file named after the document type
        #[arg(long, conflicts_with = "out")]
        save: bool,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging("info");

    let settings = Settings::from_env()?;
    let pipeline = settings.pipeline()?;

    match cli.command {
        Command::Serve { addr } => serve(&addr, pipeline).await,
        Command::Generate {
            document_type,
            detail_level,
            notes,
            out,
            save,
        } => {
            let params = SynthesisParameters::new(document_type, detail_level, read_notes(&notes)?);
            let destination = match (out, save) {
                (Some(path), _) => Destination::File(path),
                (None, true) => Destination::Download,
                (None, false) => Destination::Stdout,
            };
            let text = generate(&pipeline, params, &destination).await?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
