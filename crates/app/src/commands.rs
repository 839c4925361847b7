//! CLI command definitions and dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use assured_application::{AuthenticatedClient, TokenStore};
use assured_domain::marketplace::{Amount, OfferRequest};
use assured_domain::{
    ApiRequest, Credentials, HttpMethod, MultipartForm, QueryParams, RegisterRequest, Role,
};
use assured_infrastructure::{ClientConfig, FileTokenStore, ReqwestTransport, attach_file};
use clap::{Args, Parser, Subcommand};

use crate::output::{print_json, report_session_events};

/// Assured Farming marketplace client
#[derive(Debug, Parser)]
#[command(name = "assured", version, about, long_about = None)]
pub struct Cli {
    /// API root, e.g. http://localhost:8000/api/v1
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Where to keep the session tokens
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginArgs),
    /// Create an account
    Register(RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Me,
    /// Show whether a session is stored and when it expires
    Status,
    /// Marketplace listings
    #[command(subcommand)]
    Listings(ListingsCommand),
    /// Contracts and offers
    #[command(subcommand)]
    Contracts(ContractsCommand),
    /// KYC documents
    #[command(subcommand)]
    Kyc(KycCommand),
    /// Notifications
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Send a request to any API path with the stored session
    Call(CallArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account username
    #[arg(short, long)]
    pub username: String,
    /// Account password
    #[arg(short, long, env = "ASSURED_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Desired username
    #[arg(short, long)]
    pub username: String,
    /// Email address
    #[arg(short, long)]
    pub email: String,
    /// Ten digit mobile number
    #[arg(long)]
    pub phone: String,
    /// Account role: farmer or buyer
    #[arg(long, value_parser = parse_role)]
    pub role: Role,
    /// Password
    #[arg(short, long, env = "ASSURED_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum ListingsCommand {
    /// List listings
    List {
        /// Filter by crop
        #[arg(long)]
        crop: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Page number
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show one listing
    Get {
        /// Listing id
        id: u64,
    },
    /// List available crops
    Crops,
}

#[derive(Debug, Subcommand)]
pub enum ContractsCommand {
    /// List contracts
    List,
    /// Show one contract
    Get {
        /// Contract id
        id: u64,
    },
    /// Make an offer on a listing
    Offer {
        /// Listing id
        #[arg(long)]
        listing: u64,
        /// Quantity requested
        #[arg(long)]
        quantity: f64,
        /// Price per unit offered
        #[arg(long)]
        price: f64,
        /// Delivery location
        #[arg(long)]
        location: String,
        /// Note to the farmer
        #[arg(long)]
        notes: Option<String>,
    },
    /// Sign an accepted contract
    Sign {
        /// Contract id
        id: u64,
    },
}

#[derive(Debug, Subcommand)]
pub enum KycCommand {
    /// Upload a KYC document
    Upload {
        /// Document type, e.g. aadhaar or pan
        #[arg(long)]
        document_type: String,
        /// File to upload
        #[arg(long)]
        file: PathBuf,
    },
    /// Show KYC verification status
    Status,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications
    List,
    /// Mark one notification as read
    Read {
        /// Notification id
        id: u64,
    },
    /// Mark every notification as read
    ReadAll,
}

#[derive(Debug, Args)]
pub struct CallArgs {
    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET", value_parser = parse_method)]
    pub method: HttpMethod,
    /// Path relative to the API root, e.g. /analytics/dashboard/
    pub path: String,
    /// Query parameter as key=value; repeatable
    #[arg(short, long, value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,
    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,
}

impl CallArgs {
    fn to_request(&self) -> anyhow::Result<ApiRequest> {
        let query: QueryParams = self.query.iter().cloned().collect();
        let request = ApiRequest::new(self.method, &self.path).with_query(query);
        match &self.data {
            Some(_) if !self.method.has_body() => {
                anyhow::bail!("{} requests do not take a body", self.method)
            }
            Some(data) => {
                let body: serde_json::Value =
                    serde_json::from_str(data).context("--data is not valid JSON")?;
                Ok(request.with_json(&body)?)
            }
            None => Ok(request),
        }
    }
}

fn parse_method(value: &str) -> Result<HttpMethod, String> {
    value.parse().map_err(|e: assured_domain::DomainError| e.to_string())
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::from_wire(value).ok_or_else(|| format!("unknown role '{value}'"))
}

fn parse_query_pair(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{value}'"))
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let client = self.build_client()?;
        let mut events = client.subscribe();

        let result = self.dispatch(&client).await;
        report_session_events(&mut events);
        result
    }

    fn build_client(&self) -> anyhow::Result<AuthenticatedClient> {
        let mut config = ClientConfig::load()?;
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url)?;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }

        let store = match self.token_file.as_ref().or(config.token_file.as_ref()) {
            Some(path) => FileTokenStore::new(path),
            None => FileTokenStore::default_location()?,
        };
        tracing::debug!(path = %store.path().display(), "using token file");

        let transport = ReqwestTransport::new(&config)?;
        let store: Arc<dyn TokenStore> = Arc::new(store);
        Ok(AuthenticatedClient::new(Arc::new(transport), store))
    }

    async fn dispatch(&self, client: &AuthenticatedClient) -> anyhow::Result<()> {
        match &self.command {
            Commands::Login(args) => {
                client
                    .auth()
                    .login(&Credentials::new(&args.username, &args.password))
                    .await?;
                println!("Logged in as {}", args.username);
            }
            Commands::Register(args) => {
                let payload = RegisterRequest {
                    username: args.username.clone(),
                    email: args.email.clone(),
                    phone: args.phone.clone(),
                    password: args.password.clone(),
                    password_confirm: args.password.clone(),
                    role: args.role,
                };
                let registration = client.auth().register(&payload).await?;
                if registration.logged_in {
                    println!("Registered and logged in as {}", args.username);
                } else {
                    println!("Registered {}; run `assured login` to continue", args.username);
                }
            }
            Commands::Logout => {
                client.auth().logout().await?;
                println!("Logged out");
            }
            Commands::Me => {
                let user = client.auth().me().await?;
                let role = user.role().map_or("unknown", Role::as_str);
                println!("{} ({role})", user.username);
                if !user.is_verified {
                    println!("KYC not verified");
                }
            }
            Commands::Status => {
                println!("{}", client.session_status().await?.display_message());
            }
            Commands::Listings(command) => listings(client, command).await?,
            Commands::Contracts(command) => contracts(client, command).await?,
            Commands::Kyc(command) => kyc(client, command).await?,
            Commands::Notifications(command) => notifications(client, command).await?,
            Commands::Call(args) => {
                let value = client
                    .send_json::<serde_json::Value>(args.to_request()?)
                    .await?;
                print_json(&value);
            }
        }
        Ok(())
    }
}

async fn listings(client: &AuthenticatedClient, command: &ListingsCommand) -> anyhow::Result<()> {
    match command {
        ListingsCommand::List { crop, search, page } => {
            let mut query = QueryParams::new();
            query.push_opt("crop", crop.as_deref());
            query.push_opt("search", search.as_deref());
            query.push_opt("page", *page);

            let page = client.listings().list(query).await?;
            for listing in page.items() {
                let price = listing
                    .unit_price()
                    .map_or_else(|| "-".to_string(), ToString::to_string);
                println!("{:>6}  {:<32}  {price}", listing.id, listing.display_name());
            }
            println!("{} of {} listings", page.items().len(), page.total());
        }
        ListingsCommand::Get { id } => {
            let listing = client.listings().get(*id).await?;
            print_json(&serde_json::to_value(listing)?);
        }
        ListingsCommand::Crops => print_json(&client.listings().crops().await?),
    }
    Ok(())
}

async fn contracts(client: &AuthenticatedClient, command: &ContractsCommand) -> anyhow::Result<()> {
    match command {
        ContractsCommand::List => {
            let page = client.contracts().list(QueryParams::new()).await?;
            for contract in page.items() {
                println!(
                    "{:>6}  {:<12}",
                    contract.id,
                    contract.status_name.as_deref().unwrap_or("-")
                );
            }
        }
        ContractsCommand::Get { id } => {
            let contract = client.contracts().get(*id).await?;
            print_json(&serde_json::to_value(contract)?);
        }
        ContractsCommand::Offer {
            listing,
            quantity,
            price,
            location,
            notes,
        } => {
            let offer = OfferRequest {
                listing: *listing,
                quantity: Amount::from(*quantity),
                price_per_unit: Amount::from(*price),
                delivery_location: location.clone(),
                notes: notes.clone(),
            };
            let contract = client.contracts().make_offer(&offer).await?;
            println!("Offer sent, contract {}", contract.id);
        }
        ContractsCommand::Sign { id } => print_json(&client.contracts().sign(*id).await?),
    }
    Ok(())
}

async fn kyc(client: &AuthenticatedClient, command: &KycCommand) -> anyhow::Result<()> {
    match command {
        KycCommand::Upload {
            document_type,
            file,
        } => {
            let form = MultipartForm::new().text("document_type", document_type);
            let form = attach_file(form, "document", file)
                .await
                .context("could not attach KYC document")?;
            print_json(&client.auth().upload_kyc(form).await?);
        }
        KycCommand::Status => print_json(&client.auth().kyc_status().await?),
    }
    Ok(())
}

async fn notifications(
    client: &AuthenticatedClient,
    command: &NotificationsCommand,
) -> anyhow::Result<()> {
    let service = client.notifications();
    let value = match command {
        NotificationsCommand::List => service.list(QueryParams::new()).await?,
        NotificationsCommand::Read { id } => service.mark_read(*id).await?,
        NotificationsCommand::ReadAll => service.mark_all_read().await?,
    };
    print_json(&value);
    Ok(())
}
