//! `hosconnect`: terminal front end for the HosConnect dashboards.
//!
//! The CLI owns one [`AuthContext`] per invocation. The signed-in user is
//! restored from a file store under `--state-dir`, so `login`, `wallet
//! connect` and the dashboard commands work across separate runs. Listing and
//! record commands talk to the API service; write commands first go through
//! the demo contract and then record the result with the API.
//!
//! The API only accepts ratings, treatments and emergency flags from
//! addresses it has registered. `register` (or `login --register` with a
//! wallet already connected) posts the user's wallet address to the matching
//! register route. A 409 answer means the address is already known and is
//! not an error.

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::contract::{ContractError, DemoContract, MedicalContract};
use client::net::api::{API_URL_ENV, ApiError, DEFAULT_API_URL, MedicalApi};
use client::state::auth::{AuthContext, AuthError};
use client::state::directory::{filter_doctors, filter_patients, format_rating, rating_stars};
use client::state::login::LoginForm;
use client::storage::FileStore;
use client::util::theme::{ThemeMode, ThemeState};
use client::wallet::bridge::{BRIDGE_URL_ENV, BridgeWallet, DEFAULT_BRIDGE_URL, Pairing, PairingApprover};
use client::wallet::injected::{INJECTED_ACCOUNT_ENV, InjectedWallet};
use client::wallet::{ConnectMethod, WalletConnector, WalletError};
use records::{
    EmergencyPatient, NearbyDoctor, RateDoctorRequest, RegisterDoctorRequest, RegisterPatientRequest, Role,
    SetEmergencyRequest, SubmitPowRequest, User, format_address,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error("not logged in; run `hosconnect login` first")]
    NotLoggedIn,
    #[error("no wallet connected; run `hosconnect wallet connect` first")]
    NoWallet,
    #[error("`{command}` is only available to {expected}s")]
    WrongRole { command: &'static str, expected: &'static str },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "hosconnect", about = "HosConnect doctor/patient dashboard CLI")]
struct Cli {
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    base_url: String,

    /// Directory holding the saved session.
    #[arg(long, env = "HOSCONNECT_STATE_DIR", default_value = ".hosconnect")]
    state_dir: PathBuf,

    /// Simulated latency of demo contract calls.
    #[arg(long, env = "HOSCONNECT_CONTRACT_DELAY_MS", default_value_t = 1000)]
    contract_delay_ms: u64,

    #[arg(long, env = BRIDGE_URL_ENV, default_value = DEFAULT_BRIDGE_URL)]
    bridge_url: String,

    /// Account the extension wallet approves with. Unset means no extension.
    #[arg(long, env = INJECTED_ACCOUNT_ENV)]
    injected_account: Option<String>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "HOSCONNECT_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    api: MedicalApi,
    state_dir: PathBuf,
    contract_delay: Duration,
    bridge_url: String,
    injected_account: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the API service is up.
    Ping,
    Login(LoginArgs),
    /// Register the signed-in user's wallet with the API service.
    Register,
    Logout,
    /// Show the saved session user.
    Whoami,
    Wallet(WalletCommand),
    /// List doctors, optionally filtered.
    Doctors {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        specialization: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// List patients who flagged an emergency.
    Patients {
        #[arg(long, default_value = "")]
        search: String,
    },
    Stats,
    /// Show the on-ledger record for an address.
    User { address: String },
    /// Rate a doctor (patients only).
    Rate {
        doctor: String,
        rating: i64,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Record a treatment for a patient (doctors only).
    Pow(PowArgs),
    /// Raise or clear your emergency flag (patients only).
    Emergency {
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
    /// Request a login challenge nonce.
    Challenge,
    /// Generate a throwaway doctor and patient keypair.
    TestAccounts,
    /// Print the dashboard palette.
    Theme {
        #[arg(long, default_value_t = false)]
        dark: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    Doctor,
    Patient,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Doctor => Role::Doctor,
            RoleArg::Patient => Role::Patient,
        }
    }
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long, value_enum)]
    role: RoleArg,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    specialization: String,

    /// Also register the role on the contract, and with the API service
    /// when a wallet is already connected.
    #[arg(long, default_value_t = false)]
    register: bool,
}

#[derive(Args, Debug)]
struct WalletCommand {
    #[command(subcommand)]
    command: WalletSubcommand,
}

#[derive(Subcommand, Debug)]
enum WalletSubcommand {
    Connect {
        /// `extension` (falls back to QR) or `qr`.
        #[arg(long, default_value = "extension")]
        method: ConnectMethod,
    },
    Disconnect,
}

#[derive(Args, Debug)]
struct PowArgs {
    patient: String,

    #[arg(long)]
    treatment: String,

    #[arg(long)]
    medications: Option<String>,

    /// Follow-up date; implies a follow-up is required.
    #[arg(long)]
    follow_up_date: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(&cli.log)?;

    let ctx = CliContext {
        api: MedicalApi::new(cli.base_url),
        state_dir: cli.state_dir,
        contract_delay: Duration::from_millis(cli.contract_delay_ms),
        bridge_url: cli.bridge_url,
        injected_account: cli.injected_account,
    };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Login(args) => run_login(&ctx, args).await,
        Command::Register => run_register(&ctx).await,
        Command::Logout => run_logout(&ctx).await,
        Command::Whoami => run_whoami(&ctx),
        Command::Wallet(wallet) => run_wallet(&ctx, wallet).await,
        Command::Doctors { search, specialization, location } => {
            run_doctors(&ctx, &search, specialization.as_deref(), location.as_deref()).await
        }
        Command::Patients { search } => run_patients(&ctx, &search).await,
        Command::Stats => print_json(&ctx.api.global_stats().await?),
        Command::User { address } => print_json(&ctx.api.user_info(&address).await?),
        Command::Rate { doctor, rating, comment } => run_rate(&ctx, doctor, rating, comment).await,
        Command::Pow(args) => run_pow(&ctx, args).await,
        Command::Emergency { clear } => run_emergency(&ctx, !clear).await,
        Command::Challenge => print_json(&ctx.api.challenge().await?),
        Command::TestAccounts => print_json(&ctx.api.test_accounts().await?),
        Command::Theme { dark } => {
            run_theme(dark);
            Ok(())
        }
    }
}

fn init_logging(level: &str) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

// =============================================================================
// SESSION
// =============================================================================

fn contract(ctx: &CliContext) -> Arc<dyn MedicalContract> {
    Arc::new(DemoContract::new(ctx.contract_delay))
}

/// Auth context with the saved user restored.
fn session(ctx: &CliContext) -> Result<AuthContext, CliError> {
    let injected = Arc::new(InjectedWallet::new(ctx.injected_account.clone()));
    let bridge = Arc::new(BridgeWallet::new(ctx.bridge_url.clone(), Arc::new(StdinApprover)));
    let wallet = WalletConnector::new(injected, bridge);
    let mut auth = AuthContext::new(Box::new(FileStore::new(&ctx.state_dir)), wallet, contract(ctx));
    auth.load()?;
    Ok(auth)
}

/// Prints the pairing URI and reads the approved account from stdin.
struct StdinApprover;

#[async_trait]
impl PairingApprover for StdinApprover {
    async fn approve(&self, pairing: &Pairing) -> Result<Vec<String>, WalletError> {
        eprintln!("Open this pairing URI in your wallet app:\n  {}", pairing.uri);
        eprintln!("Paste the approved account address (blank to reject):");

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| WalletError::Session(format!("failed to read approval: {e}")))?;

        let accounts = parse_accounts(&line);
        if accounts.is_empty() {
            return Err(WalletError::Rejected);
        }
        Ok(accounts)
    }
}

/// Accounts from a comma- or whitespace-separated line.
fn parse_accounts(line: &str) -> Vec<String> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn require_role<'a>(user: Option<&'a User>, expected: Role, command: &'static str) -> Result<&'a User, CliError> {
    let user = user.ok_or(CliError::NotLoggedIn)?;
    if user.role != Some(expected) {
        return Err(CliError::WrongRole { command, expected: expected.as_str() });
    }
    Ok(user)
}

fn wallet_address(user: &User) -> Result<String, CliError> {
    user.address.clone().filter(|_| user.wallet_connected).ok_or(CliError::NoWallet)
}

// =============================================================================
// REGISTRATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Registration {
    Doctor(RegisterDoctorRequest),
    Patient(RegisterPatientRequest),
}

/// Register request for the signed-in user's role and wallet.
fn registration_request(user: Option<&User>) -> Result<Registration, CliError> {
    let user = user.ok_or(CliError::NotLoggedIn)?;
    let wallet_address = wallet_address(user)?;
    let name = user.name.clone().unwrap_or_default();
    match user.role.ok_or(CliError::NotLoggedIn)? {
        Role::Doctor => Ok(Registration::Doctor(RegisterDoctorRequest {
            name,
            specialization: user.specialization.clone().unwrap_or_default(),
            wallet_address,
        })),
        Role::Patient => Ok(Registration::Patient(RegisterPatientRequest { name, wallet_address })),
    }
}

/// Transaction id of a new registration, or `None` if the address was
/// already registered.
async fn register_on_server(api: &MedicalApi, registration: &Registration) -> Result<Option<String>, CliError> {
    let result = match registration {
        Registration::Doctor(request) => api.register_doctor(request).await,
        Registration::Patient(request) => api.register_patient(request).await,
    };
    match result {
        Ok(response) => Ok(Some(response.transaction_id)),
        Err(err) if err.status() == Some(409) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn report_registration(tx_id: Option<&str>) {
    match tx_id {
        Some(tx_id) => eprintln!("registered with API: {tx_id}"),
        None => eprintln!("already registered with API"),
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let health = ctx.api.health().await?;
    println!("{}", health.status);
    Ok(())
}

async fn run_login(ctx: &CliContext, args: LoginArgs) -> Result<(), CliError> {
    let mut auth = session(ctx)?;
    let form = LoginForm::new(args.role.into(), &args.name, &args.specialization);
    if let Some(tx_id) = auth.login(&form, args.register).await? {
        eprintln!("registered on chain: {tx_id}");
    }
    if args.register {
        match registration_request(auth.user()) {
            Ok(registration) => {
                let tx_id = register_on_server(&ctx.api, &registration).await?;
                report_registration(tx_id.as_deref());
            }
            Err(CliError::NoWallet) => eprintln!("connect a wallet, then run `hosconnect register`"),
            Err(err) => return Err(err),
        }
    }
    print_json(&auth.user())
}

async fn run_register(ctx: &CliContext) -> Result<(), CliError> {
    let auth = session(ctx)?;
    let registration = registration_request(auth.user())?;
    let tx_id = register_on_server(&ctx.api, &registration).await?;
    report_registration(tx_id.as_deref());
    Ok(())
}

async fn run_logout(ctx: &CliContext) -> Result<(), CliError> {
    let mut auth = session(ctx)?;
    auth.logout().await?;
    println!("logged out");
    Ok(())
}

fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    let auth = session(ctx)?;
    match auth.user() {
        Some(user) => print_json(user),
        None => {
            println!("not logged in");
            Ok(())
        }
    }
}

async fn run_wallet(ctx: &CliContext, wallet: WalletCommand) -> Result<(), CliError> {
    let mut auth = session(ctx)?;
    match wallet.command {
        WalletSubcommand::Connect { method } => {
            let address = auth.connect_wallet(method).await?;
            println!("connected {}", format_address(&address));
            if auth.user().is_none() {
                eprintln!("not logged in; address was not saved");
            }
        }
        WalletSubcommand::Disconnect => {
            auth.disconnect_wallet().await;
            println!("wallet disconnected");
        }
    }
    Ok(())
}

async fn run_doctors(
    ctx: &CliContext,
    search: &str,
    specialization: Option<&str>,
    location: Option<&str>,
) -> Result<(), CliError> {
    let doctors = ctx.api.nearby_doctors(location).await?;
    let matches = filter_doctors(&doctors, search, specialization);
    if matches.is_empty() {
        println!("no doctors found");
    }
    for doctor in matches {
        println!("{}", doctor_line(doctor));
    }
    Ok(())
}

async fn run_patients(ctx: &CliContext, search: &str) -> Result<(), CliError> {
    let patients = ctx.api.emergency_patients().await?;
    let matches = filter_patients(&patients, search);
    if matches.is_empty() {
        println!("no emergency patients");
    }
    for patient in matches {
        println!("{}", patient_line(patient));
    }
    Ok(())
}

async fn run_rate(ctx: &CliContext, doctor: String, rating: i64, comment: Option<String>) -> Result<(), CliError> {
    let auth = session(ctx)?;
    let user = require_role(auth.user(), Role::Patient, "rate")?;
    let patient_address = wallet_address(user)?;

    let tx_id = auth.contract().rate_doctor(&doctor, rating).await?;
    tracing::info!(%tx_id, "rating submitted to contract");

    let request = RateDoctorRequest { patient_address, doctor_address: doctor, rating, comment };
    print_json(&ctx.api.submit_rating(&request).await?)
}

async fn run_pow(ctx: &CliContext, args: PowArgs) -> Result<(), CliError> {
    let auth = session(ctx)?;
    let user = require_role(auth.user(), Role::Doctor, "pow")?;
    let doctor_address = wallet_address(user)?;

    let tx_id = auth.contract().submit_proof_of_work(&args.patient, &args.treatment).await?;
    tracing::info!(%tx_id, "proof of work submitted to contract");

    let request = SubmitPowRequest {
        doctor_address,
        patient_address: args.patient,
        treatment_description: args.treatment,
        medications: args.medications,
        follow_up_required: args.follow_up_date.is_some(),
        follow_up_date: args.follow_up_date,
    };
    print_json(&ctx.api.submit_pow(&request).await?)
}

async fn run_emergency(ctx: &CliContext, emergency: bool) -> Result<(), CliError> {
    let auth = session(ctx)?;
    let user = require_role(auth.user(), Role::Patient, "emergency")?;
    let patient_address = wallet_address(user)?;

    let tx_id = auth.contract().set_emergency_status(emergency).await?;
    tracing::info!(%tx_id, emergency, "emergency status submitted to contract");

    let request = SetEmergencyRequest { patient_address, emergency_status: emergency };
    print_json(&ctx.api.set_emergency_status(&request).await?)
}

fn run_theme(dark: bool) {
    let theme = ThemeState::new(ThemeMode::from_dark(dark));
    let palette = theme.palette();
    println!("mode:       {}", theme.mode);
    println!("background: {}", palette.background);
    println!("foreground: {}", palette.foreground);
    println!("primary:    {}", palette.primary);
    println!("secondary:  {}", palette.secondary);
    println!("card:       {}", palette.card);
}

// =============================================================================
// RENDERING
// =============================================================================

fn doctor_line(doctor: &NearbyDoctor) -> String {
    format!(
        "{} | {} | {} {} | {} | {} consultations | {}",
        doctor.name,
        doctor.specialization,
        rating_stars(doctor.rating),
        format_rating(doctor.rating),
        doctor.location,
        doctor.consultations_count,
        doctor.address,
    )
}

fn patient_line(patient: &EmergencyPatient) -> String {
    format!("{} | {} | {}", patient.name, patient.location, patient.address)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
