use crate::infra::{render_bills, TerminalScreen};
use billed::bills::{
    BillId, BillRepository, BillsPage, FileSelection, HttpBillStore, NewBillForm, NewBillPorts,
    NewBillSubmitter, SelectedFile,
};
use billed::config::AppConfig;
use billed::error::AppError;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Open the receipt preview of this bill
    #[arg(long)]
    pub(crate) preview: Option<String>,
    /// Width available to the receipt preview, in pixels
    #[arg(long, default_value_t = 800)]
    pub(crate) modal_width: u32,
    /// Print the rows as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            preview: None,
            modal_width: 800,
            json: false,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Receipt image (.jpg, .jpeg or .png)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Expense type, e.g. "Transports"
    #[arg(long = "type")]
    pub(crate) expense_type: String,
    #[arg(long)]
    pub(crate) name: String,
    /// Expense date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) date: String,
    /// Amount including VAT
    #[arg(long)]
    pub(crate) amount: String,
    /// VAT amount
    #[arg(long, default_value = "")]
    pub(crate) vat: String,
    /// VAT rate in percent (defaults to 20)
    #[arg(long, default_value = "")]
    pub(crate) pct: String,
    #[arg(long, default_value = "")]
    pub(crate) commentary: String,
}

pub(crate) async fn run_list(config: &AppConfig, args: ListArgs) -> Result<(), AppError> {
    let store = Arc::new(HttpBillStore::new(&config.api));
    let screen = Arc::new(TerminalScreen::default());
    let page = BillsPage::new(BillRepository::new(store), screen.clone(), screen);

    let view = page.load().await;
    if args.json {
        let body = serde_json::to_string_pretty(&view)
            .map_err(|err| AppError::Usage(format!("unable to render bills: {err}")))?;
        println!("{body}");
    } else {
        render_bills(&view);
    }

    if let Some(id) = args.preview {
        let id = BillId(id);
        let bill = view
            .rows
            .iter()
            .find(|row| row.id == id)
            .ok_or_else(|| AppError::Usage(format!("no bill with id {id}")))?;
        if !page.preview_receipt(bill, args.modal_width) {
            println!("Aucun justificatif pour la note {id}");
        }
    }

    Ok(())
}

pub(crate) async fn run_submit(config: &AppConfig, args: SubmitArgs) -> Result<(), AppError> {
    let session = config.user.session()?;
    let content = tokio::fs::read(&args.file).await?;

    let store = Arc::new(HttpBillStore::new(&config.api));
    let screen = Arc::new(TerminalScreen::with_selection(args.file.clone()));
    let ports = NewBillPorts {
        alert: screen.clone(),
        file_input: screen.clone(),
        navigator: screen,
    };
    let mut submitter = NewBillSubmitter::new(store, session, ports);

    let selected = SelectedFile::new(args.file.to_string_lossy(), content);
    if let FileSelection::Rejected = submitter.handle_file_selection(selected).await? {
        return Err(AppError::Usage("receipt rejected, bill not submitted".to_string()));
    }

    let record = submitter
        .handle_submit(NewBillForm {
            expense_type: args.expense_type,
            name: args.name,
            date: args.date,
            amount: args.amount,
            vat: args.vat,
            pct: args.pct,
            commentary: args.commentary,
        })
        .await?;

    println!("Note de frais {} envoyée ({})", record.id, record.status.as_str());
    Ok(())
}
