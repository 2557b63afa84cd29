use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use rand::rngs::OsRng;
use rand::RngCore;

use xo_core::{Generator, Seed, TokenId, WORD_BYTES};
use xo_ledger::{Amount, Collection, CollectionConfig};

/// Operator tools for the XO collection. State lives in a JSON snapshot on
/// disk; mutating commands write it back in place.
#[derive(Parser)]
#[command(name = "xo", version, about = "XO collection operator tools")]
struct Cli {
    /// Path to the collection snapshot.
    #[arg(long, default_value = "collection.json", global = true)]
    ledger: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a fresh collection snapshot.
    Init {
        /// Admin account; receives sale proceeds.
        #[arg(long)]
        admin: String,
        /// Mint price in minimal units.
        #[arg(long)]
        mint_price: Option<Amount>,
        /// Maximum number of tokens.
        #[arg(long)]
        max_supply: Option<u64>,
    },
    /// Mint a token.
    Mint {
        /// Recipient account.
        #[arg(long)]
        to: String,
        /// Seed as hex; generated randomly when omitted.
        #[arg(long)]
        seed: Option<String>,
        /// Offered payment in minimal units.
        #[arg(long)]
        value: Amount,
    },
    /// Render a minted token's plate.
    Draw {
        #[arg(long)]
        token: TokenId,
    },
    /// Print a minted token's 64 state words as hex.
    State {
        #[arg(long)]
        token: TokenId,
    },
    /// Print a minted token's metadata URI.
    TokenUri {
        #[arg(long)]
        token: TokenId,
    },
    /// Configure the URI prefix. Admin only.
    SetBaseUri {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        uri: String,
    },
    /// Pay out a payee's full pending balance. Admin only.
    Withdraw {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        payee: String,
    },
    /// Move a token to a new owner.
    Transfer {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        token: TokenId,
    },
    /// Summarize the collection.
    Info,
}

fn load(path: &Path) -> Collection {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", path.display());
            process::exit(2);
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(collection) => collection,
        Err(err) => {
            eprintln!("error: malformed snapshot {}: {err}", path.display());
            process::exit(2);
        }
    }
}

fn save(path: &Path, collection: &Collection) {
    let json = serde_json::to_vec_pretty(collection).expect("snapshot json");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    fs::write(path, json).expect("write snapshot");
    log::debug!("snapshot saved to {}", path.display());
}

fn parse_seed(input: Option<&str>) -> Seed {
    match input {
        Some(raw) => match raw.parse() {
            Ok(seed) => seed,
            Err(err) => {
                eprintln!("error: invalid --seed: {err}");
                process::exit(2);
            }
        },
        None => {
            let mut bytes = [0u8; WORD_BYTES];
            OsRng.fill_bytes(&mut bytes);
            Seed::from_bytes(bytes)
        }
    }
}

fn fail(err: impl Display) -> ! {
    eprintln!("error: {err}");
    process::exit(2);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let generator = Generator::new();

    match cli.command {
        Command::Init {
            admin,
            mint_price,
            max_supply,
        } => {
            let mut config = CollectionConfig::new(admin);
            if let Some(price) = mint_price {
                config.mint_price = price;
            }
            if let Some(cap) = max_supply {
                config.max_supply = cap;
            }
            let collection = Collection::new(config);
            save(&cli.ledger, &collection);
            println!("Collection initialized → {}", cli.ledger.display());
        }
        Command::Mint { to, seed, value } => {
            let mut collection = load(&cli.ledger);
            let seed = parse_seed(seed.as_deref());
            match collection.mint_to(&to, seed, value) {
                Ok(token_id) => {
                    save(&cli.ledger, &collection);
                    log::info!("minted token {token_id} to {to}");
                    println!("Minted token {token_id} (seed {seed}) → {to}");
                }
                Err(err) => fail(err),
            }
        }
        Command::Draw { token } => {
            let collection = load(&cli.ledger);
            match generator.draw(&collection, token) {
                Ok(text) => print!("{text}"),
                Err(err) => fail(err),
            }
        }
        Command::State { token } => {
            let collection = load(&cli.ledger);
            match generator.initial_state(&collection, token) {
                Ok(state) => {
                    for word in state.words() {
                        println!("{}", hex::encode(word));
                    }
                }
                Err(err) => fail(err),
            }
        }
        Command::TokenUri { token } => {
            let collection = load(&cli.ledger);
            match collection.token_uri(token) {
                Ok(uri) => println!("{uri}"),
                Err(err) => fail(err),
            }
        }
        Command::SetBaseUri { caller, uri } => {
            let mut collection = load(&cli.ledger);
            match collection.set_base_uri(&caller, uri.clone()) {
                Ok(()) => {
                    save(&cli.ledger, &collection);
                    println!("Base URI → {uri}");
                }
                Err(err) => fail(err),
            }
        }
        Command::Withdraw { caller, payee } => {
            let mut collection = load(&cli.ledger);
            match collection.withdraw(&caller, &payee) {
                Ok(amount) => {
                    save(&cli.ledger, &collection);
                    log::info!("paid out {amount} to {payee}");
                    println!("Withdrawn {amount} → {payee}");
                }
                Err(err) => fail(err),
            }
        }
        Command::Transfer { caller, to, token } => {
            let mut collection = load(&cli.ledger);
            match collection.transfer(&caller, &to, token) {
                Ok(()) => {
                    save(&cli.ledger, &collection);
                    println!("Token {token} → {to}");
                }
                Err(err) => fail(err),
            }
        }
        Command::Info => {
            let collection = load(&cli.ledger);
            let config = collection.config();
            println!("admin:         {}", config.admin);
            println!("mint price:    {}", config.mint_price);
            println!("max supply:    {}", config.max_supply);
            println!("minted:        {}", collection.total_minted());
            println!("base URI:      {}", collection.base_uri().unwrap_or("(unset)"));
            println!("admin pending: {}", collection.pending_of(&config.admin));
        }
    }
}
