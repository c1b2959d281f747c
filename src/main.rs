use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use zkk::artifact;
use zkk::binius::field::BinaryFieldElement;
use zkk::binius::proof::{prove, verify, PackedProofParams};
use zkk::keys::derive_bit_sequence;

#[derive(Parser)]
#[command(name = "zkk")]
#[command(about = "Zero-knowledge commitment to the bit representation of a secret key")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prove an evaluation of the secret's bit-vector and emit the proof artifact
    Generate {
        /// Hex-encoded secret whose bits are committed
        secret: String,
        /// Evaluation point as a bit string, least-significant coordinate first
        #[arg(short, long, default_value = "01")]
        point: String,
        /// Output path for the proof artifact
        #[arg(short, long, default_value = "zkk_proof.bin")]
        output: PathBuf,
        /// Emit the JSON text transport instead of the binary format
        #[arg(long)]
        json: bool,
    },
    /// Verify a previously emitted proof artifact
    Verify {
        /// Path to the proof artifact
        proof_path: PathBuf,
    },
}

fn parse_point(text: &str) -> Result<Vec<BinaryFieldElement>> {
    text.chars()
        .map(|c| match c {
            '0' => Ok(BinaryFieldElement::ZERO),
            '1' => Ok(BinaryFieldElement::ONE),
            other => Err(anyhow!("evaluation point must be a bit string, found {other:?}")),
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            secret,
            point,
            output,
            json,
        } => {
            let evaluations = derive_bit_sequence(&secret)?;
            info!(bits = evaluations.len(), "derived bit sequence from secret");
            let point = parse_point(&point)?;

            let proof = prove(&evaluations, &point, &PackedProofParams::default())?;
            let payload = if json {
                artifact::encode_proof_json(&proof)?.into_bytes()
            } else {
                artifact::encode_proof(&proof)?
            };
            artifact::emit(&output, &payload)?;

            println!("proof root: {}", hex::encode(proof.root));
            println!("claimed evaluation: {}", proof.eval);
            println!("artifact written to {}", output.display());
        }

        Commands::Verify { proof_path } => {
            let bytes = fs::read(&proof_path)
                .with_context(|| format!("could not read {}", proof_path.display()))?;
            // Text artifacts start with a JSON object; everything else is
            // the binary transport.
            let proof = if bytes.first() == Some(&b'{') {
                let text =
                    std::str::from_utf8(&bytes).context("proof file is not valid UTF-8")?;
                artifact::decode_proof_json(text)?
            } else {
                artifact::decode_proof(&bytes)?
            };

            match verify(&proof) {
                Ok(()) => println!("proof verification successful"),
                Err(reason) => {
                    error!(%reason, "proof rejected");
                    println!("proof verification failed: {reason}");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
