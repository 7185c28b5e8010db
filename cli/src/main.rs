use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

use netconsole::config::{API_BASE_URL_VAR, ClientConfig, ConfigError};
use netconsole::net::api::collection::{CollectKind, MacQuery};
use netconsole::net::api::users::UserQuery;
use netconsole::net::api::{
    command_history, command_templates, configurations, devices, git_configs, inspections, ports, users,
    vlans,
};
use netconsole::net::client::ApiClient;
use netconsole::net::error::ApiError;
use netconsole::net::notify::{Notice, Notifier};
use netconsole::net::transport::ApiRequest;
use netconsole::net::types::{ListQuery, LoginRequest, PasswordChange, ProfileUpdate};
use netconsole::routing::guard::RouteGuard;
use netconsole::routing::routes::{
    COLLECTION_PATH, COMMAND_HISTORY_PATH, COMMAND_TEMPLATES_PATH, CONFIGURATIONS_PATH, DEVICES_PATH, GIT_CONFIGS_PATH,
    INSPECTIONS_PATH, PORTS_PATH, PROFILE_PATH, USERS_PATH, VLANS_PATH,
};
use netconsole::routing::{HOME_PATH, LOGIN_PATH, Location, Router, redirect_target};
use netconsole::state::auth::{AuthError, AuthStore};
use netconsole::state::collection::CollectionStore;
use netconsole::state::devices::DeviceStore;
use netconsole::state::session::SessionContext;
use netconsole::state::token::{FileTokenStore, StoreError};

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{field} must be a JSON object")]
    NotAnObject { field: &'static str },
    #[error("io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open {requested}: redirected to {location}")]
    Navigation { requested: String, location: String },
}

#[derive(Parser, Debug)]
#[command(name = "netconsole", about = "Network device operations console")]
struct Cli {
    #[arg(long, env = API_BASE_URL_VAR)]
    api_base_url: Option<String>,

    #[arg(long, env = "NETCONSOLE_ORIGIN")]
    origin: Option<String>,

    #[arg(long, env = "NETCONSOLE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[arg(long, env = "NETCONSOLE_CONNECT_TIMEOUT_SECS")]
    connect_timeout_secs: Option<u64>,

    #[arg(long, env = "NETCONSOLE_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Variable map equivalent to the flags, so flags and environment share
    /// one parser.
    fn config_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                vars.insert(key.to_owned(), value);
            }
        };
        put(API_BASE_URL_VAR, self.api_base_url.clone());
        put("NETCONSOLE_ORIGIN", self.origin.clone());
        put("NETCONSOLE_TIMEOUT_SECS", self.timeout_secs.map(|v| v.to_string()));
        put("NETCONSOLE_CONNECT_TIMEOUT_SECS", self.connect_timeout_secs.map(|v| v.to_string()));
        put("NETCONSOLE_TOKEN_FILE", self.token_file.as_ref().map(|p| p.display().to_string()));
        vars
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a login captcha.
    Captcha,
    Login(LoginArgs),
    Logout,
    /// Show the logged-in identity.
    Whoami,
    Profile(ProfileCommand),
    /// Run the route guard for a console path and report where it lands.
    Open { path: String },
    Devices(DevicesCommand),
    Ports(CrudCommand),
    Vlans(CrudCommand),
    Inspections(InspectionsCommand),
    Configs(ConfigsCommand),
    Collect(CollectCommand),
    Macs(MacsCommand),
    History(HistoryCommand),
    Templates(TemplatesCommand),
    GitConfigs(GitConfigsCommand),
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    username: String,
    #[arg(long, env = "NETCONSOLE_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, default_value = "")]
    captcha_id: String,
    #[arg(long, default_value = "")]
    captcha_code: String,
    #[arg(long, default_value_t = false)]
    remember: bool,
    /// Console path to open after logging in.
    #[arg(long)]
    redirect: Option<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    skip: Option<u64>,
    #[arg(long)]
    limit: Option<u64>,
    #[arg(long)]
    keyword: Option<String>,
    #[arg(long)]
    device_id: Option<i64>,
}

impl ListArgs {
    fn query(&self) -> ListQuery {
        ListQuery { skip: self.skip, limit: self.limit, keyword: self.keyword.clone(), device_id: self.device_id }
    }
}

#[derive(Args, Debug)]
struct CrudCommand {
    #[command(subcommand)]
    command: CrudSubcommand,
}

#[derive(Subcommand, Debug)]
enum CrudSubcommand {
    List(ListArgs),
    Get { id: i64 },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete { id: i64 },
    BatchDelete { ids: Vec<i64> },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update {
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    Password {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
}

#[derive(Args, Debug)]
struct DevicesCommand {
    #[command(subcommand)]
    command: DevicesSubcommand,
}

#[derive(Subcommand, Debug)]
enum DevicesSubcommand {
    #[command(flatten)]
    Crud(CrudSubcommand),
    /// Set the status of several devices in one request.
    BatchStatus {
        #[arg(long)]
        status: String,
        ids: Vec<i64>,
    },
    Test { id: i64 },
    Exec {
        id: i64,
        #[arg(long)]
        command: String,
        #[arg(long)]
        template_id: Option<i64>,
        /// Template variables as a JSON object.
        #[arg(long)]
        variables: Option<String>,
    },
    Import {
        file: PathBuf,
        #[arg(long, default_value_t = false)]
        skip_existing: bool,
    },
    /// Download the import spreadsheet template.
    Template {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct InspectionsCommand {
    #[command(subcommand)]
    command: InspectionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum InspectionsSubcommand {
    List(ListArgs),
    Get { id: i64 },
    Run { device_id: i64 },
    BatchRun { device_ids: Vec<i64> },
}

#[derive(Args, Debug)]
struct ConfigsCommand {
    #[command(subcommand)]
    command: ConfigsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ConfigsSubcommand {
    List(ListArgs),
    Get { id: i64 },
    Latest { device_id: i64 },
    Collect { device_id: i64 },
    Diff { first_id: i64, second_id: i64 },
    Delete { id: i64 },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum KindArg {
    Version,
    Serial,
    Interfaces,
    MacTable,
}

impl From<KindArg> for CollectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Version => Self::Version,
            KindArg::Serial => Self::Serial,
            KindArg::Interfaces => Self::Interfaces,
            KindArg::MacTable => Self::MacTable,
        }
    }
}

#[derive(Args, Debug)]
struct CollectCommand {
    #[command(subcommand)]
    command: CollectSubcommand,
}

#[derive(Subcommand, Debug)]
enum CollectSubcommand {
    Run {
        device_id: i64,
        #[arg(long, value_enum)]
        kind: KindArg,
    },
    Batch {
        #[arg(long = "kind", value_enum, required = true)]
        kinds: Vec<KindArg>,
        device_ids: Vec<i64>,
    },
    /// Collect version, serial, interfaces and MAC table in turn.
    All { device_id: i64 },
}

#[derive(Args, Debug)]
struct MacsCommand {
    #[command(subcommand)]
    command: MacsSubcommand,
}

#[derive(Subcommand, Debug)]
enum MacsSubcommand {
    List {
        #[arg(long)]
        device_id: Option<i64>,
        #[arg(long)]
        vlan_id: Option<i64>,
        #[arg(long)]
        limit: Option<u64>,
    },
    Search { mac_address: String },
    Device { device_id: i64 },
}

#[derive(Args, Debug)]
struct HistoryCommand {
    #[command(subcommand)]
    command: HistorySubcommand,
}

#[derive(Subcommand, Debug)]
enum HistorySubcommand {
    List(ListArgs),
    Get { id: i64 },
    Delete { id: i64 },
    Clear {
        #[arg(long)]
        device_id: Option<i64>,
    },
}

#[derive(Args, Debug)]
struct TemplatesCommand {
    #[command(subcommand)]
    command: TemplatesSubcommand,
}

#[derive(Subcommand, Debug)]
enum TemplatesSubcommand {
    List(ListArgs),
    Get { id: i64 },
    Vendor { vendor: String },
    DeviceType { device_type: String },
}

#[derive(Args, Debug)]
struct GitConfigsCommand {
    #[command(subcommand)]
    command: GitConfigsSubcommand,
}

#[derive(Subcommand, Debug)]
enum GitConfigsSubcommand {
    List(ListArgs),
    Get { id: i64 },
    Test { id: i64 },
    Activate { id: i64 },
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[arg(long)]
        page: Option<u64>,
        #[arg(long)]
        page_size: Option<u64>,
        #[arg(long)]
        keyword: Option<String>,
    },
    Get { id: i64 },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete { id: i64 },
    ResetPassword {
        id: i64,
        #[arg(long)]
        password: String,
    },
}

/// Prints notices to stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: &Notice) {
        eprintln!("[{}] {}", notice.class, notice.message);
    }
}

struct Console {
    client: Arc<ApiClient>,
    auth: Arc<AuthStore>,
    router: Router,
}

impl Console {
    fn open(config: &ClientConfig) -> Result<Self, CliError> {
        let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
        let session = Arc::new(SessionContext::hydrate(store)?);
        let location = Arc::new(Location::new(HOME_PATH));
        let client = Arc::new(ApiClient::from_config(config, session, Arc::new(StderrNotifier), location.clone())?);
        let auth = Arc::new(AuthStore::new(client.clone()));
        let router = Router::new(RouteGuard::new(auth.clone()), location);
        Ok(Self { client, auth, router })
    }

    /// Navigate to `path`, failing unless the guard lets the console in.
    async fn enter(&self, path: &str) -> Result<(), CliError> {
        let nav = self.router.navigate(path).await;
        if nav.entered() {
            return Ok(());
        }
        if let Some(return_to) = redirect_target(&nav.location) {
            eprintln!("login required; run `netconsole login --redirect {return_to}`");
        }
        Err(CliError::Navigation { requested: nav.requested, location: nav.location })
    }

    async fn call(&self, request: ApiRequest) -> Result<(), CliError> {
        let value: Value = self.client.send_json(request).await?;
        print_json(&value)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_vars(&cli.config_vars())?;
    tracing::debug!(base_url = %config.effective_base_url(), "console configured");
    let console = Console::open(&config)?;

    match cli.command {
        Command::Captcha => {
            let captcha = console.auth.fetch_captcha().await?;
            print_json(&serde_json::to_value(captcha)?)
        }
        Command::Login(args) => run_login(&console, args).await,
        Command::Logout => {
            console.auth.logout().await?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&console).await,
        Command::Profile(profile) => run_profile(&console, profile).await,
        Command::Open { path } => {
            let nav = console.router.navigate(&path).await;
            print_json(&serde_json::json!({
                "requested": nav.requested,
                "location": nav.location,
                "entered": nav.entered(),
            }))
        }
        Command::Devices(cmd) => run_devices(&console, cmd).await,
        Command::Ports(cmd) => {
            console.enter(PORTS_PATH).await?;
            run_crud(&console, &PORTS, cmd.command).await
        }
        Command::Vlans(cmd) => {
            console.enter(VLANS_PATH).await?;
            run_crud(&console, &VLANS, cmd.command).await
        }
        Command::Inspections(cmd) => run_inspections(&console, cmd).await,
        Command::Configs(cmd) => run_configs(&console, cmd).await,
        Command::Collect(cmd) => run_collect(&console, cmd).await,
        Command::Macs(cmd) => run_macs(&console, cmd).await,
        Command::History(cmd) => run_history(&console, cmd).await,
        Command::Templates(cmd) => run_templates(&console, cmd).await,
        Command::GitConfigs(cmd) => run_git_configs(&console, cmd).await,
        Command::Users(cmd) => run_users(&console, cmd).await,
    }
}

async fn run_login(console: &Console, args: LoginArgs) -> Result<(), CliError> {
    let nav = console.router.navigate(LOGIN_PATH).await;
    if !nav.entered() {
        println!("already logged in as {}", console.auth.nickname());
        return Ok(());
    }

    let response = console
        .auth
        .login(&LoginRequest {
            username: args.username,
            password: args.password,
            captcha_id: args.captcha_id,
            captcha_code: args.captcha_code,
            remember: args.remember,
        })
        .await?;
    println!("logged in as {}", response.user.display_name());

    if let Some(target) = args.redirect {
        let nav = console.router.navigate(&target).await;
        println!("opened {}", nav.location);
    }
    Ok(())
}

async fn run_whoami(console: &Console) -> Result<(), CliError> {
    match console.auth.restore().await? {
        Some(profile) => {
            let mut value = serde_json::to_value(&profile)?;
            if let Value::Object(map) = &mut value {
                map.insert("is_admin".to_owned(), Value::Bool(profile.is_admin()));
            }
            print_json(&value)
        }
        None => {
            println!("not logged in");
            Ok(())
        }
    }
}

async fn run_profile(console: &Console, profile: ProfileCommand) -> Result<(), CliError> {
    console.enter(PROFILE_PATH).await?;
    match profile.command {
        ProfileSubcommand::Show => console.call(users::my_profile()).await,
        ProfileSubcommand::Update { nickname, email, phone, avatar } => {
            let update = ProfileUpdate { nickname, email, phone, avatar };
            let merged = console.auth.update_profile(&update).await?;
            print_json(&serde_json::to_value(merged)?)
        }
        ProfileSubcommand::Password { old, new } => {
            console
                .call(users::change_password(&PasswordChange { old_password: old, new_password: new }))
                .await
        }
    }
}

/// Request builders for a plain CRUD resource.
struct CrudFacade {
    list: fn(&ListQuery) -> ApiRequest,
    get: fn(i64) -> ApiRequest,
    create: fn(Value) -> ApiRequest,
    update: fn(i64, Value) -> ApiRequest,
    delete: fn(i64) -> ApiRequest,
    batch_delete: fn(&[i64]) -> ApiRequest,
}

const PORTS: CrudFacade = CrudFacade {
    list: ports::list,
    get: ports::get,
    create: ports::create,
    update: ports::update,
    delete: ports::delete,
    batch_delete: ports::batch_delete,
};

const VLANS: CrudFacade = CrudFacade {
    list: vlans::list,
    get: vlans::get,
    create: vlans::create,
    update: vlans::update,
    delete: vlans::delete,
    batch_delete: vlans::batch_delete,
};

async fn run_crud(console: &Console, facade: &CrudFacade, command: CrudSubcommand) -> Result<(), CliError> {
    let request = match command {
        CrudSubcommand::List(args) => (facade.list)(&args.query()),
        CrudSubcommand::Get { id } => (facade.get)(id),
        CrudSubcommand::Create { data } => (facade.create)(parse_json(&data)?),
        CrudSubcommand::Update { id, data } => (facade.update)(id, parse_json(&data)?),
        CrudSubcommand::Delete { id } => (facade.delete)(id),
        CrudSubcommand::BatchDelete { ids } => (facade.batch_delete)(&ids),
    };
    console.call(request).await
}

async fn run_devices(console: &Console, cmd: DevicesCommand) -> Result<(), CliError> {
    console.enter(DEVICES_PATH).await?;
    let store = DeviceStore::new(console.client.clone());
    match cmd.command {
        DevicesSubcommand::Crud(crud) => match crud {
            CrudSubcommand::List(args) => {
                store.fetch(&args.query()).await?;
                tracing::debug!(total = store.count(), active = store.active().len(), "devices loaded");
                print_json(&serde_json::to_value(store.devices())?)
            }
            CrudSubcommand::BatchDelete { ids } => {
                let result = store.batch_delete(&ids).await?;
                print_json(&serde_json::to_value(result)?)
            }
            CrudSubcommand::Get { id } => console.call(devices::get(id)).await,
            CrudSubcommand::Create { data } => console.call(devices::create(parse_json(&data)?)).await,
            CrudSubcommand::Update { id, data } => console.call(devices::update(id, parse_json(&data)?)).await,
            CrudSubcommand::Delete { id } => console.call(devices::delete(id)).await,
        },
        DevicesSubcommand::BatchStatus { status, ids } => {
            let result = store.batch_update_status(&ids, &status).await?;
            print_json(&serde_json::to_value(result)?)
        }
        DevicesSubcommand::Test { id } => console.call(devices::test_connectivity(id)).await,
        DevicesSubcommand::Exec { id, command, template_id, variables } => {
            let variables = match variables {
                Some(raw) => parse_json_object(&raw, "--variables")?,
                None => Map::new(),
            };
            console
                .call(devices::execute_command(id, &command, variables, template_id))
                .await
        }
        DevicesSubcommand::Import { file, skip_existing } => {
            let bytes = tokio::fs::read(&file).await?;
            let file_name = file
                .file_name()
                .map_or_else(|| "devices.xlsx".to_owned(), |name| name.to_string_lossy().into_owned());
            console
                .call(devices::batch_import(&file_name, bytes, skip_existing))
                .await
        }
        DevicesSubcommand::Template { out } => {
            let blob = console.client.send_blob(devices::import_template()).await?;
            let path = out
                .or_else(|| blob.file_name().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("device_import_template.xlsx"));
            tokio::fs::write(&path, &blob.bytes).await?;
            println!("saved {} ({} bytes)", path.display(), blob.bytes.len());
            Ok(())
        }
    }
}

async fn run_inspections(console: &Console, cmd: InspectionsCommand) -> Result<(), CliError> {
    console.enter(INSPECTIONS_PATH).await?;
    let request = match cmd.command {
        InspectionsSubcommand::List(args) => inspections::list(&args.query()),
        InspectionsSubcommand::Get { id } => inspections::get(id),
        InspectionsSubcommand::Run { device_id } => inspections::run(device_id),
        InspectionsSubcommand::BatchRun { device_ids } => inspections::batch_run(&device_ids),
    };
    console.call(request).await
}

async fn run_configs(console: &Console, cmd: ConfigsCommand) -> Result<(), CliError> {
    console.enter(CONFIGURATIONS_PATH).await?;
    let request = match cmd.command {
        ConfigsSubcommand::List(args) => configurations::list(&args.query()),
        ConfigsSubcommand::Get { id } => configurations::get(id),
        ConfigsSubcommand::Latest { device_id } => configurations::latest(device_id),
        ConfigsSubcommand::Collect { device_id } => configurations::collect(device_id),
        ConfigsSubcommand::Diff { first_id, second_id } => configurations::diff(first_id, second_id),
        ConfigsSubcommand::Delete { id } => configurations::delete(id),
    };
    console.call(request).await
}

async fn run_collect(console: &Console, cmd: CollectCommand) -> Result<(), CliError> {
    console.enter(COLLECTION_PATH).await?;
    let store = CollectionStore::new(console.client.clone());
    let value = match cmd.command {
        CollectSubcommand::Run { device_id, kind } => serde_json::to_value(store.collect(device_id, kind.into()).await?)?,
        CollectSubcommand::Batch { kinds, device_ids } => {
            let kinds = kinds.into_iter().map(CollectKind::from).collect::<Vec<_>>();
            serde_json::to_value(store.batch_collect(&device_ids, &kinds).await?)?
        }
        CollectSubcommand::All { device_id } => serde_json::to_value(store.collect_all(device_id).await)?,
    };
    print_json(&value)?;
    if store.snapshot().has_mac_data() {
        print_json(&serde_json::to_value(store.mac_table())?)?;
    }
    Ok(())
}

async fn run_macs(console: &Console, cmd: MacsCommand) -> Result<(), CliError> {
    console.enter(COLLECTION_PATH).await?;
    let store = CollectionStore::new(console.client.clone());
    let entries = match cmd.command {
        MacsSubcommand::List { device_id, vlan_id, limit } => {
            store
                .all_mac_addresses(&MacQuery { device_id, vlan_id, limit, ..MacQuery::default() })
                .await?
        }
        MacsSubcommand::Search { mac_address } => store.search_mac_addresses(&mac_address).await?,
        MacsSubcommand::Device { device_id } => store.load_device_mac_table(device_id, None, None).await?,
    };
    print_json(&serde_json::to_value(entries)?)
}

async fn run_history(console: &Console, cmd: HistoryCommand) -> Result<(), CliError> {
    console.enter(COMMAND_HISTORY_PATH).await?;
    let request = match cmd.command {
        HistorySubcommand::List(args) => match args.device_id {
            Some(device_id) => command_history::for_device(
                device_id,
                &ListQuery { device_id: None, ..args.query() },
            ),
            None => command_history::list(&args.query()),
        },
        HistorySubcommand::Get { id } => command_history::get(id),
        HistorySubcommand::Delete { id } => command_history::delete(id),
        HistorySubcommand::Clear { device_id: Some(device_id) } => command_history::delete_for_device(device_id),
        HistorySubcommand::Clear { device_id: None } => command_history::clear(),
    };
    console.call(request).await
}

async fn run_templates(console: &Console, cmd: TemplatesCommand) -> Result<(), CliError> {
    console.enter(COMMAND_TEMPLATES_PATH).await?;
    let request = match cmd.command {
        TemplatesSubcommand::List(args) => command_templates::list(&args.query()),
        TemplatesSubcommand::Get { id } => command_templates::get(id),
        TemplatesSubcommand::Vendor { vendor } => command_templates::by_vendor(&vendor),
        TemplatesSubcommand::DeviceType { device_type } => command_templates::by_device_type(&device_type),
    };
    console.call(request).await
}

async fn run_git_configs(console: &Console, cmd: GitConfigsCommand) -> Result<(), CliError> {
    console.enter(GIT_CONFIGS_PATH).await?;
    let request = match cmd.command {
        GitConfigsSubcommand::List(args) => git_configs::list(&args.query()),
        GitConfigsSubcommand::Get { id } => git_configs::get(id),
        GitConfigsSubcommand::Test { id } => git_configs::test_connection(id),
        GitConfigsSubcommand::Activate { id } => git_configs::set_active(id),
    };
    console.call(request).await
}

async fn run_users(console: &Console, cmd: UsersCommand) -> Result<(), CliError> {
    console.enter(USERS_PATH).await?;
    let request = match cmd.command {
        UsersSubcommand::List { page, page_size, keyword } => users::list(&UserQuery { page, page_size, keyword }),
        UsersSubcommand::Get { id } => users::get(id),
        UsersSubcommand::Create { data } => users::create(parse_json(&data)?),
        UsersSubcommand::Update { id, data } => users::update(id, parse_json(&data)?),
        UsersSubcommand::Delete { id } => users::delete(id),
        UsersSubcommand::ResetPassword { id, password } => users::reset_password(id, &password),
    };
    console.call(request).await
}

fn parse_json(raw: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str::<Value>(raw)?)
}

fn parse_json_object(raw: &str, field: &'static str) -> Result<Map<String, Value>, CliError> {
    match parse_json(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::NotAnObject { field }),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
