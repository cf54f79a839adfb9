use anyhow::{anyhow, Context, Result};
use clap::Parser;
use ethers::types::Address;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use txconfirm::{
    catalog::Section,
    config::Config,
    configurator::TransactionConfigurator,
    ens::ProviderNameLookup,
    presenter::{ConfirmationList, ListEvent, RenderedList},
    submission::ConfirmType,
    types::{PreviewFile, PreviewTransaction},
};

/// How long to wait for the reverse name lookup before rendering without it
const NAME_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Render a transaction confirmation list from a preview file
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Preview file (JSON)
    preview: PathBuf,

    /// Chain ID of the network the transaction targets
    #[arg(long, default_value_t = 1)]
    chain_id: u64,

    /// Signer address shown in the Balance section
    #[arg(long)]
    signer: Option<String>,

    /// Sections to expand (comma separated: balance,recipient,gas,amount)
    #[arg(long, value_delimiter = ',')]
    expand: Vec<Section>,

    /// Resolve the recipient's ENS name before rendering
    #[arg(long)]
    resolve_names: bool,

    /// Print the snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.chain_id);

    let raw = std::fs::read_to_string(&cli.preview)
        .with_context(|| format!("Failed to read preview file {}", cli.preview.display()))?;
    let file: PreviewFile = serde_json::from_str(&raw).context("Invalid preview JSON")?;
    let transaction = PreviewTransaction::try_from(&file)?;

    let signer = match &cli.signer {
        Some(s) => s
            .parse::<Address>()
            .map_err(|e| anyhow!("Invalid signer address '{}': {}", s, e))?,
        None => Address::zero(),
    };

    let mut list = ConfirmationList::new(
        TransactionConfigurator::new(transaction),
        signer,
        config.native_token(),
        ConfirmType::SignThenSend,
    );
    list.set_currency_rate(file.currency_rate.clone());

    for section in &cli.expand {
        list.apply_toggle(*section);
    }

    if cli.resolve_names {
        let lookup = Arc::new(ProviderNameLookup::new(config.get_ens_provider()?));
        if list.request_name_resolution(lookup).is_some() {
            wait_for_name(&mut list);
        }
    }

    let rendered = list.render();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        print!(
            "{}",
            render_text(list.navigation_title(), &config.network_label(), &rendered)
        );
    }

    Ok(())
}

fn wait_for_name(list: &mut ConfirmationList) {
    let deadline = Instant::now() + NAME_LOOKUP_TIMEOUT;
    while list.name_resolution_pending() {
        if Instant::now() >= deadline {
            tracing::warn!("Name lookup timed out, rendering raw address");
            list.teardown();
            return;
        }
        for event in list.poll() {
            match event {
                ListEvent::NameResolved(_) => {
                    tracing::info!("Resolved recipient name: {:?}", list.ens_name())
                }
                ListEvent::NameUnavailable => tracing::info!("No name for recipient"),
                ListEvent::SubmissionFinished(_) => {}
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn render_text(title: &str, network: &str, rendered: &RenderedList) -> String {
    let mut out = format!("{} ({})\n", title, network);
    for section in &rendered.sections {
        let marker = match (section.header.expandable, section.header.expanded) {
            (false, _) => "   ",
            (true, true) => "[-]",
            (true, false) => "[+]",
        };
        out.push_str(&format!(
            "{} {}: {}\n",
            marker, section.header.title, section.header.subtitle
        ));
        for row in &section.rows {
            out.push_str(&format!(
                "      {}: {}\n",
                row.title,
                row.subtitle.as_deref().unwrap_or("")
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Bytes, U256};
    use txconfirm::types::TransferKind;

    fn list() -> ConfirmationList {
        let tx = PreviewTransaction {
            to: Some(Address::repeat_byte(0xbb)),
            value: U256::from(15u64) * U256::from(10u64.pow(17)),
            gas_price: U256::from(20_000_000_000u64),
            gas_limit: U256::from(21_000u64),
            nonce: None,
            data: Bytes::default(),
            transfer: TransferKind::Native,
        };
        ConfirmationList::new(
            TransactionConfigurator::new(tx),
            Address::zero(),
            "ETH",
            ConfirmType::SignThenSend,
        )
    }

    #[test]
    fn test_render_text_shows_network_and_markers() {
        let mut list = list();
        list.apply_toggle(Section::Gas);
        let config = Config::new(137);
        let text = render_text(list.navigation_title(), &config.network_label(), &list.render());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Confirm Transaction (Polygon)");
        assert_eq!(lines[1], "[+] Balance: Default");
        assert!(lines.contains(&"[-] Speed (Gas): Default"));
        assert!(lines.contains(&"      Gas Limit: 21000"));
        assert_eq!(lines.last(), Some(&"    Amount: -1.5 ETH"));
    }
}
