use clap::{Args, Parser, Subcommand};
use ehr_core::{
    CoreConfig, PatientFields, PatientRecord, PatientService, StoreBackend, VitalSigns,
    DEFAULT_PATIENT_DATA_DIR,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ehr")]
#[command(about = "EHR patient record system CLI")]
struct Cli {
    /// Patient data directory holding the file-backed record store
    #[arg(long, env = "PATIENT_DATA_DIR", default_value = DEFAULT_PATIENT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patient records
    List {
        /// Only show records containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Print one record as JSON
    Show {
        /// Record id (32 lowercase hex characters)
        id: String,
    },
    /// Create a patient record
    Create(#[command(flatten)] FieldArgs),
    /// Update the given fields of a patient record
    Update {
        /// Record id (32 lowercase hex characters)
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Permanently delete a patient record
    Delete {
        /// Record id (32 lowercase hex characters)
        id: String,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    /// Patient name
    #[arg(long)]
    name: Option<String>,
    /// Age in whole years
    #[arg(long, allow_negative_numbers = true)]
    age: Option<i64>,
    /// Male, Female or Other
    #[arg(long)]
    gender: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    dob: Option<String>,
    /// Stable, Critical or Recovering
    #[arg(long)]
    status: Option<String>,
    /// Medical history entry (repeatable; replaces the stored list)
    #[arg(long = "history")]
    medical_history: Vec<String>,
    /// Medication (repeatable; replaces the stored list)
    #[arg(long = "medication")]
    medications: Vec<String>,
    /// Blood pressure reading, e.g. 120/80
    #[arg(long)]
    blood_pressure: Option<String>,
    /// External EHR identifier
    #[arg(long)]
    ehr_id: Option<String>,
}

impl From<FieldArgs> for PatientFields {
    fn from(args: FieldArgs) -> Self {
        let list = |items: Vec<String>| (!items.is_empty()).then_some(items);
        PatientFields {
            patient_name: args.name,
            age: args.age,
            gender: args.gender,
            dob: args.dob,
            status: args.status,
            medical_history: list(args.medical_history),
            medications: list(args.medications),
            vital_signs: args.blood_pressure.map(|bp| VitalSigns {
                blood_pressure: Some(bp),
            }),
            ehr_id: args.ehr_id,
        }
    }
}

fn summary(record: &PatientRecord) -> String {
    format!(
        "ID: {}, EHR: {}, Name: {}, Age: {}, Status: {}, Updated: {}",
        record.id,
        record.ehr_id,
        record.patient_name,
        record.age,
        record.status,
        record.updated_at.to_rfc3339()
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'ehr --help' for commands");
        return Ok(());
    };

    let cfg = CoreConfig::new(cli.data_dir, StoreBackend::File);
    let service = PatientService::new(cfg.open_store()?);

    match command {
        Commands::List { search } => {
            let records = match search {
                Some(term) => service.search(&term)?,
                None => service.list()?,
            };
            if records.is_empty() {
                println!("No patient records found.");
            } else {
                for record in &records {
                    println!("{}", summary(record));
                }
            }
        }
        Commands::Show { id } => match service.get(&id) {
            Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            Err(e) => eprintln!("Error reading record: {}", e),
        },
        Commands::Create(fields) => match service.create(fields.into()) {
            Ok(record) => println!("Created record: {}", summary(&record)),
            Err(e) => eprintln!("Error creating record: {}", e),
        },
        Commands::Update { id, fields } => match service.update(&id, fields.into()) {
            Ok(record) => println!("Updated record: {}", summary(&record)),
            Err(e) => eprintln!("Error updating record: {}", e),
        },
        Commands::Delete { id } => match service.delete(&id) {
            Ok(()) => println!("Deleted record: {}", id),
            Err(e) => eprintln!("Error deleting record: {}", e),
        },
    }

    Ok(())
}
