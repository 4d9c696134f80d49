//! Database seeder for Alianza development and testing.
//!
//! Seeds partners, executives, clients with commission splits (including two records of
//! the same company under differently spelled names) and a month of
//! transfers, going through the repositories so every derived field and
//! commission row is produced by the real write path.
//!
//! Usage: cargo run --bin seeder

use alianza_core::client::{AdministrativeCategory, ExecutiveAssignment, SlotInput};
use alianza_db::{
    entities::{
        partners,
        sea_orm_active_enums::{InvoicingCompany, PaymentMethod, PaymentStatus},
    },
    repositories::{
        ClientRepository, CreateClientInput, CreateExecutiveInput, CreatePartnerInput,
        CreateTransferInput, ExecutiveRepository, PartnerRepository, TransferRepository,
    },
};
use alianza_shared::{AppConfig, types::{ExecutiveId, PartnerId}};
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = alianza_db::connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    if partners::Entity::find().count(&db).await? > 0 {
        println!("  Partners already exist, skipping...");
        return Ok(());
    }

    println!("Seeding partners...");
    let [norte, sur, centro] = seed_partners(&db).await?;

    println!("Seeding executives...");
    let executives = seed_executives(&db).await?;

    println!("Seeding clients...");
    let clients = seed_clients(&db, [norte, sur, centro], executives).await?;

    println!("Seeding transfers...");
    let today = config.business.today()?;
    seed_transfers(&db, &clients, today).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Seeds three partners.
async fn seed_partners(db: &DatabaseConnection) -> anyhow::Result<[Uuid; 3]> {
    let repo = PartnerRepository::new(db.clone());
    let mut ids = [Uuid::nil(); 3];
    for (slot, (name, email)) in ids.iter_mut().zip([
        ("Alianza Norte", Some("norte@alianza.dev")),
        ("Alianza Sur", Some("sur@alianza.dev")),
        ("Alianza Centro", None),
    ]) {
        let partner = repo
            .create(CreatePartnerInput {
                name: name.to_string(),
                email: email.map(str::to_string),
            })
            .await?;
        println!("  {} ({})", partner.name, partner.id);
        *slot = partner.id;
    }
    Ok(ids)
}

/// Seeds two executives.
async fn seed_executives(db: &DatabaseConnection) -> anyhow::Result<[ExecutiveId; 2]> {
    let repo = ExecutiveRepository::new(db.clone());
    let mut ids = [ExecutiveId::from_uuid(Uuid::nil()); 2];
    for (slot, name) in ids.iter_mut().zip(["Laura Ruiz", "Mario Pineda"]) {
        let executive = repo
            .create(CreateExecutiveInput {
                name: name.to_string(),
                email: None,
            })
            .await?;
        println!("  {} ({})", executive.name, executive.id);
        *slot = ExecutiveId::from_uuid(executive.id);
    }
    Ok(ids)
}

fn slot(partner: Uuid, percent: &str) -> SlotInput {
    SlotInput {
        partner_id: Some(PartnerId::from_uuid(partner)),
        percentage: Some(percent.to_string()),
    }
}

/// Seeds clients: a 6/4 split, a duplicate-name record, a CONFEDIN client
/// and one without commissions. The first executive leads the Acme records,
/// the second leads Globex with the first as support.
async fn seed_clients(
    db: &DatabaseConnection,
    [norte, sur, centro]: [Uuid; 3],
    [laura, mario]: [ExecutiveId; 2],
) -> anyhow::Result<Vec<Uuid>> {
    let repo = ClientRepository::new(db.clone());
    let acme_team = ExecutiveAssignment {
        executive: Some(laura),
        ..Default::default()
    };
    let inputs = [
        CreateClientInput {
            business_name: "  acme corp ".to_string(),
            ac: None,
            service: "PROCOM".to_string(),
            executives: acme_team,
            slots: vec![slot(norte, "6"), slot(sur, "4")],
        },
        CreateClientInput {
            business_name: "ACME  CORP".to_string(),
            ac: None,
            service: "PROCOM".to_string(),
            executives: acme_team,
            slots: vec![slot(norte, "6"), slot(sur, "4")],
        },
        CreateClientInput {
            business_name: "Globex Industrial".to_string(),
            ac: Some(AdministrativeCategory::Confedin),
            service: "NOMINA".to_string(),
            executives: ExecutiveAssignment {
                executive: Some(mario),
                secondary: None,
                support: Some(laura),
            },
            slots: vec![slot(centro, "7.5"), slot(norte, "2.5")],
        },
        CreateClientInput {
            business_name: "Initech".to_string(),
            ac: Some(AdministrativeCategory::Servicio),
            service: "ASESORIA".to_string(),
            executives: ExecutiveAssignment::default(),
            slots: Vec::new(),
        },
    ];

    let mut ids = Vec::with_capacity(inputs.len());
    for input in inputs {
        let client = repo.create(input).await?;
        println!(
            "  {} rate={} slots={}",
            client.client.business_name,
            client.client.service_commission_rate,
            client.slots.len()
        );
        ids.push(client.client.id);
    }
    Ok(ids)
}

/// Seeds transfers dated in the month before `today`.
async fn seed_transfers(
    db: &DatabaseConnection,
    clients: &[Uuid],
    today: NaiveDate,
) -> anyhow::Result<()> {
    let period = alianza_core::commission::CommissionPeriod::previous_to(today)?;
    let day = |d: u32| {
        NaiveDate::from_ymd_opt(period.year(), period.month(), d)
            .context("invalid seed date")
    };

    let repo = TransferRepository::new(db.clone());
    let plan = [
        (0, 5, Decimal::new(100_000, 2), PaymentStatus::Paid),
        (1, 12, Decimal::new(25_050, 2), PaymentStatus::Pending),
        (2, 15, Decimal::new(1_000_000, 2), PaymentStatus::Paid),
        (3, 20, Decimal::new(50_000, 2), PaymentStatus::Paid),
    ];

    for (client_index, d, amount, payment_status) in plan {
        let Some(client_id) = clients.get(client_index).copied() else {
            continue;
        };
        let mut input = CreateTransferInput::new(client_id, day(d)?, amount);
        input.payment_status = payment_status;
        input.invoicing_company = Some(InvoicingCompany::Anmara);
        input.payment_method = Some(PaymentMethod::Pue);
        input.period_label = Some(period.to_string());

        let transfer = repo.create(input, today).await?;
        println!(
            "  {} {} commission={} with_tax={} rows={} released={}",
            transfer.transfer.transfer_date,
            transfer.transfer.amount,
            transfer.transfer.commission_amount,
            transfer.transfer.commission_amount_with_tax,
            transfer.commissions.len(),
            transfer.commissions.iter().all(|c| c.released),
        );
    }
    Ok(())
}
