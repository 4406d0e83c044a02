mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use attach_client::HttpFolderService;
use attach_common::{init_logging, AppConfig, AttachmentError};
use attach_domain::{Partition, Scope};
use attach_explorer::Explorer;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "attach", version, about = "Explorador de adjuntos de órdenes y activos")]
pub struct Cli {
    /// URL base del servidor (por defecto ATTACH_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Token Bearer (por defecto ATTACH_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Gestor propietario, p. ej. `ordenes` o `activos`
    #[arg(long)]
    gestor: String,

    #[arg(long)]
    id: String,

    /// Usar el espacio de materiales en lugar de la documentación general
    #[arg(long)]
    materiales: bool,

    /// Solo lectura: no se permiten cambios estructurales
    #[arg(long)]
    read_only: bool,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Muestra el árbol
    Tree {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        expand_all: bool,
        #[arg(long)]
        depth: Option<usize>,
        /// Imprime el árbol como JSON
        #[arg(long)]
        json: bool,
    },
    /// Crea una carpeta bajo `parent` (`/` para la raíz)
    Mkdir { parent: String, name: String },
    /// Sube un fichero local a `parent`
    Upload { parent: String, file: PathBuf },
    /// Renombra una carpeta
    Rename { key: String, new_name: String },
    /// Elimina un fichero o una carpeta con todo su contenido
    Rm { key: String },
    Download {
        key: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Abre el fichero con la aplicación predeterminada
    View { key: String },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "warn" });

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: no se pudo iniciar el runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(cli)) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("command failed: {:?}", err);
            eprintln!("error: {}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<String, AttachmentError> {
    let mut config = AppConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if cli.token.is_some() {
        config.token = cli.token;
    }
    if let Command::Tree { depth: Some(depth), .. } = &cli.command {
        config.render_depth = *depth;
    }

    let scope = Scope::new(cli.gestor, cli.id, Partition::from_flag(cli.materiales));
    let service = HttpFolderService::new(&config)?;
    let mut explorer = Explorer::new(service, scope).with_render_depth(config.render_depth);
    if cli.read_only {
        explorer = explorer.read_only();
    }
    explorer.refresh().await?;

    match cli.command {
        Command::Tree {
            search,
            expand_all,
            json,
            ..
        } => commands::tree::show_tree(&mut explorer, search.as_deref(), expand_all, json),
        Command::Mkdir { parent, name } => commands::folder::mkdir(&mut explorer, &parent, &name).await,
        Command::Upload { parent, file } => commands::file::upload(&mut explorer, &parent, &file).await,
        Command::Rename { key, new_name } => commands::folder::rename(&mut explorer, &key, &new_name).await,
        Command::Rm { key } => commands::folder::remove(&mut explorer, &key).await,
        Command::Download { key, out } => commands::file::download(&explorer, &key, out).await,
        Command::View { key } => commands::file::view(&explorer, &key).await,
    }
}
