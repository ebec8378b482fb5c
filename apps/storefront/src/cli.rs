//! # `metiz` Command Line
//!
//! Each invocation loads the config, restores the saved session, runs one
//! subcommand against the backend and exits.
//!
//! ```text
//! metiz cart                          show the cart and its total
//! metiz add <id> [--quantity N]       add a product
//! metiz update <id> <N>               set a line's quantity
//! metiz remove <id>                   drop a line
//! metiz clear                         empty the cart
//! metiz order --full-name .. --phone .. --address ..
//! metiz login --email .. --password ..
//! metiz logout
//! metiz register-buyer ...            create a buyer account
//! metiz register-vendor ...           create a vendor account
//! metiz menu                          navigation entries for the session
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use metiz_core::{
    BuyerProfile, CartState, ContactDetails, Credentials, PhotoUpload, ProductId,
    RegistrationForm, RegistrationProfile, VendorProfile,
};

use crate::config::StorefrontConfig;
use crate::error::{AppError, AppResult};
use crate::flows::RegistrationOutcome;
use crate::Storefront;

#[derive(Debug, Parser)]
#[command(name = "metiz", about = "Metiz marketplace storefront", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "METIZ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the cart
    Cart,

    /// Add a product to the cart
    Add {
        product_id: ProductId,

        #[arg(long, short, default_value_t = 1)]
        quantity: i64,
    },

    /// Set the quantity of a cart line
    Update {
        product_id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a product from the cart
    Remove { product_id: ProductId },

    /// Empty the cart
    Clear,

    /// Place an order for the whole cart
    Order(OrderArgs),

    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "METIZ_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Create a buyer account
    RegisterBuyer(BuyerArgs),

    /// Create a vendor account
    RegisterVendor(VendorArgs),

    /// Show the navigation menu for the current session
    Menu,
}

#[derive(Debug, Args)]
struct OrderArgs {
    #[arg(long)]
    full_name: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    address: String,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    comment: Option<String>,
}

#[derive(Debug, Args)]
struct CredentialArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,

    #[arg(long)]
    confirm_password: String,

    /// Profile photo (jpeg, png, gif or webp)
    #[arg(long)]
    photo: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BuyerArgs {
    #[command(flatten)]
    credentials: CredentialArgs,

    #[arg(long)]
    name: String,

    #[arg(long)]
    surname: String,

    #[arg(long)]
    phone: String,

    /// YYYY-MM-DD
    #[arg(long)]
    birth_date: Option<NaiveDate>,

    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Debug, Args)]
struct VendorArgs {
    #[command(flatten)]
    credentials: CredentialArgs,

    /// Business name
    #[arg(long)]
    name: String,

    #[arg(long)]
    contact_person: String,

    #[arg(long)]
    registration_number: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    address: String,

    #[arg(long, default_value = "")]
    description: String,
}

impl Cli {
    pub async fn run(self) -> AppResult<ExitCode> {
        let config = StorefrontConfig::load(self.config.clone())?;
        let storefront = Storefront::new(config)?;
        debug!(command = ?self.command, "run");

        match self.command {
            Commands::Cart => {
                storefront.cart.refresh().await?;
                print_cart(&storefront, &storefront.cart.snapshot());
            }
            Commands::Add {
                product_id,
                quantity,
            } => {
                storefront.cart.refresh().await?;
                storefront.cart.add_to_cart(product_id, quantity).await?;
                print_cart(&storefront, &storefront.cart.snapshot());
            }
            Commands::Update {
                product_id,
                quantity,
            } => {
                storefront.cart.refresh().await?;
                storefront.cart.update_quantity(product_id, quantity).await?;
                print_cart(&storefront, &storefront.cart.snapshot());
            }
            Commands::Remove { product_id } => {
                storefront.cart.refresh().await?;
                storefront.cart.remove_from_cart(product_id).await?;
                print_cart(&storefront, &storefront.cart.snapshot());
            }
            Commands::Clear => {
                storefront.cart.clear().await?;
                println!("Cart cleared");
            }
            Commands::Order(args) => {
                storefront.cart.refresh().await?;
                let placed = storefront.order_flow().submit(&args.into_contact()).await?;
                println!("Order {} placed", placed.confirmation.id);
                println!("-> {}", placed.redirect.route.path());
            }
            Commands::Login { email, password } => {
                let session = storefront.auth.login(&email, &password).await?;
                StorefrontConfig::save_session(self.config, Some(&session))?;
                println!("Logged in as {}", session.role);
            }
            Commands::Logout => {
                let route = storefront.auth.logout();
                StorefrontConfig::save_session(self.config, None)?;
                println!("Logged out");
                println!("-> {}", route.path());
            }
            Commands::RegisterBuyer(args) => {
                let form = args.into_form()?;
                let outcome = storefront.registration_flow().submit(form).await;
                return Ok(report(outcome).await);
            }
            Commands::RegisterVendor(args) => {
                let form = args.into_form()?;
                let outcome = storefront.registration_flow().submit(form).await;
                return Ok(report(outcome).await);
            }
            Commands::Menu => {
                let menu = storefront.auth.menu();
                for entry in &menu.entries {
                    println!("{:<14} {}", entry.label, entry.path);
                }
                if menu.show_logout {
                    println!("Log out");
                }
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

impl OrderArgs {
    fn into_contact(self) -> ContactDetails {
        ContactDetails {
            full_name: self.full_name,
            phone: self.phone,
            address: self.address,
            email: self.email,
            comment: self.comment,
        }
    }
}

impl CredentialArgs {
    fn split(self) -> AppResult<(Credentials, Option<PhotoUpload>)> {
        let photo = self.photo.as_deref().map(read_photo).transpose()?;
        let credentials = Credentials {
            email: self.email,
            password: self.password,
            confirm_password: self.confirm_password,
        };
        Ok((credentials, photo))
    }
}

impl BuyerArgs {
    fn into_form(self) -> AppResult<RegistrationForm> {
        let (credentials, photo) = self.credentials.split()?;
        Ok(RegistrationForm {
            credentials,
            profile: RegistrationProfile::Buyer(BuyerProfile {
                name: self.name,
                surname: self.surname,
                phone: self.phone,
                birth_date: self.birth_date,
                description: self.description,
            }),
            photo,
        })
    }
}

impl VendorArgs {
    fn into_form(self) -> AppResult<RegistrationForm> {
        let (credentials, photo) = self.credentials.split()?;
        Ok(RegistrationForm {
            credentials,
            profile: RegistrationProfile::Vendor(VendorProfile {
                metiz_name: self.name,
                contact_metiz_name: self.contact_person,
                registration_number: self.registration_number,
                metiz_phone: self.phone,
                address: self.address,
                metiz_description: self.description,
            }),
            photo,
        })
    }
}

fn read_photo(path: &Path) -> AppResult<PhotoUpload> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::validation(format!("Cannot read photo {}: {}", path.display(), e))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());

    Ok(PhotoUpload {
        file_name,
        content_type: content_type_for(path).to_string(),
        bytes,
    })
}

/// MIME type guessed from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn print_cart(storefront: &Storefront, state: &CartState) {
    if state.cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    let asset_base = storefront.config().api.asset_base_url().ok();
    for item in state.items() {
        println!(
            "{:>6}  {:<30} x{:<4} {}",
            item.product_id.get(),
            item.display_name(),
            item.quantity,
            item.line_total()
        );
        let photo = item
            .product
            .as_ref()
            .zip(asset_base.as_ref())
            .and_then(|(product, base)| product.photo_url(base));
        if let Some(url) = photo {
            println!("        {}", url);
        }
    }
    println!("Total: {}", state.total_amount());
}

/// Prints a registration outcome, waiting out its redirect delay.
async fn report(outcome: RegistrationOutcome) -> ExitCode {
    if outcome.notice.is_error() {
        eprintln!("{}", outcome.notice.message);
        return ExitCode::FAILURE;
    }

    println!("{}", outcome.notice.message);
    if let Some(redirect) = outcome.redirect {
        tokio::time::sleep(redirect.after).await;
        println!("-> {}", redirect.route.path());
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_defaults_to_one() {
        let cli = Cli::try_parse_from(["metiz", "add", "5"]).unwrap();
        match cli.command {
            Commands::Add {
                product_id,
                quantity,
            } => {
                assert_eq!(product_id, ProductId::new(5));
                assert_eq!(quantity, 1);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_update_accepts_negative_quantity() {
        // Rejected later by the cart, not by the parser.
        let cli = Cli::try_parse_from(["metiz", "update", "3", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Update { quantity: -1, .. }
        ));
    }

    #[test]
    fn test_bad_product_id_rejected() {
        assert!(Cli::try_parse_from(["metiz", "remove", "bread"]).is_err());
    }

    #[test]
    fn test_vendor_args_map_to_form() {
        let cli = Cli::try_parse_from([
            "metiz",
            "register-vendor",
            "--email",
            "hearth@metiz.example",
            "--password",
            "pw",
            "--confirm-password",
            "pw",
            "--name",
            "Hearth Bakery",
            "--contact-person",
            "Ivan Sokolov",
            "--registration-number",
            "1027700132195",
            "--phone",
            "+74951234567",
            "--address",
            "Moscow",
        ])
        .unwrap();

        let Commands::RegisterVendor(args) = cli.command else {
            panic!("expected register-vendor");
        };
        let payload = args.into_form().unwrap().into_payload().unwrap();
        assert_eq!(payload.field("name"), Some("Hearth Bakery"));
        assert_eq!(payload.field("contact_person_name"), Some("Ivan Sokolov"));
        assert_eq!(payload.path(), "/api/metiz/registration");
    }

    #[test]
    fn test_buyer_birth_date_parsed() {
        let cli = Cli::try_parse_from([
            "metiz",
            "register-buyer",
            "--email",
            "anna@metiz.example",
            "--password",
            "pw",
            "--confirm-password",
            "pw",
            "--name",
            "Anna",
            "--surname",
            "Petrova",
            "--phone",
            "+79123456789",
            "--birth-date",
            "1990-04-12",
        ])
        .unwrap();

        let Commands::RegisterBuyer(args) = cli.command else {
            panic!("expected register-buyer");
        };
        assert_eq!(args.birth_date, NaiveDate::from_ymd_opt(1990, 4, 12));
    }

    #[tokio::test]
    async fn test_logout_does_not_persist_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://file.example\"\n\n[auth]\ntoken = \"old\"\nrole = \"user\"\n",
        )
        .unwrap();

        std::env::set_var("METIZ_API_URL", "http://env.example");
        let cli = Cli::try_parse_from(["metiz", "--config", path.to_str().unwrap(), "logout"]).unwrap();
        let result = cli.run().await;
        std::env::remove_var("METIZ_API_URL");
        assert!(result.is_ok());

        let saved = StorefrontConfig::load_file(Some(path)).unwrap();
        assert_eq!(saved.api.base_url, "http://file.example");
        assert!(saved.auth.token.is_none());
        assert!(saved.auth.role.is_none());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("me.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }
}
