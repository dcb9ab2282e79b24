use crate::infra::{render_bills, InMemoryBillStore, TerminalScreen};
use billed::bills::{
    BillId, BillRecord, BillRepository, BillStatus, BillsPage, NewBillEvent, NewBillForm,
    NewBillPorts, NewBillSubmitter, SelectedFile, Session,
};
use billed::config::AppConfig;
use billed::error::AppError;
use chrono::Local;
use std::sync::Arc;
use tokio::sync::mpsc;

pub(crate) async fn run_demo(config: &AppConfig) -> Result<(), AppError> {
    let session = config
        .user
        .session()
        .unwrap_or_else(|_| Session::employee("employee@test.tld"));
    let store = Arc::new(InMemoryBillStore::seeded(demo_bills(&session.email)));
    let screen = Arc::new(TerminalScreen::default());
    let page = BillsPage::new(
        BillRepository::new(store.clone()),
        screen.clone(),
        screen.clone(),
    );

    println!("Billed demo for {}", session.email);
    println!("\nMes notes de frais");
    let view = page.load().await;
    render_bills(&view);
    if let Some(first) = view.rows.first() {
        page.preview_receipt(first, 800);
    }

    println!("\nNouvelle note de frais");
    page.navigate_to_new_bill();
    let ports = NewBillPorts {
        alert: screen.clone(),
        file_input: screen.clone(),
        navigator: screen,
    };
    let mut submitter = NewBillSubmitter::new(store.clone(), session, ports);

    let (events, inbox) = mpsc::channel(4);
    let script = [
        NewBillEvent::FileSelected(SelectedFile::new(
            "C:\\fakepath\\facture.pdf",
            b"%PDF-1.4".to_vec(),
        )),
        NewBillEvent::FileSelected(SelectedFile::new(
            "C:\\fakepath\\ticket-taxi.png",
            b"\x89PNG".to_vec(),
        )),
        NewBillEvent::FormSubmitted(NewBillForm {
            expense_type: "Transports".to_string(),
            name: "Taxi aéroport".to_string(),
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            amount: "58".to_string(),
            vat: "9".to_string(),
            pct: "20".to_string(),
            commentary: "retour de séminaire".to_string(),
        }),
    ];
    for event in script {
        events
            .send(event)
            .await
            .map_err(|_| AppError::Usage("demo event loop closed early".to_string()))?;
    }
    drop(events);
    submitter.run(inbox).await;
    println!(
        "Submission state: {:?} ({} receipt(s) stored)",
        submitter.state(),
        store.receipt_count()
    );

    println!("\nMes notes de frais");
    render_bills(&page.load().await);
    Ok(())
}

fn demo_bills(email: &str) -> Vec<BillRecord> {
    let bill = |id: &str, expense_type: &str, name: &str, date: &str, amount: f64, status| {
        BillRecord {
            id: BillId(id.to_string()),
            email: email.to_string(),
            expense_type: expense_type.to_string(),
            name: name.to_string(),
            date: date.to_string(),
            amount,
            status,
            commentary: None,
            file_url: Some(format!("memory://receipts/{id}/{id}.jpg")),
            file_name: Some(format!("{id}.jpg")),
            vat: Some("20".to_string()),
            pct: Some(20.0),
            comment_admin: None,
        }
    };

    vec![
        bill("demo-1", "Hôtel et logement", "encore", "2004-04-04", 400.0, BillStatus::Pending),
        bill("demo-2", "Transports", "test1", "2001-01-01", 100.0, BillStatus::Refused),
        bill("demo-3", "Services en ligne", "test3", "2003-03-03", 300.0, BillStatus::Accepted),
        bill("demo-4", "Restaurants et bars", "test2", "2002-02-02", 200.0, BillStatus::Refused),
        bill("demo-5", "Fournitures de bureau", "import", "2004-02-30", 35.0, BillStatus::Pending),
    ]
}
