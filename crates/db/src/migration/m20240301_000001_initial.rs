//! Initial schema: partners, executives, clients and their commission slots,
//! transfers and generated commissions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(TABLES_SQL).await?;
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE ac_category AS ENUM (
    'CONFEDIN', 'CAMARENCE', 'HATRES', 'SERVIARUGA', 'ZAMORA', 'INACTIVO', 'SERVICIO'
);
CREATE TYPE payment_status AS ENUM ('pending', 'paid');
CREATE TYPE process_status AS ENUM ('pending', 'sent', 'applied');
CREATE TYPE period_status AS ENUM (
    'pending', 'closed', 'stamped', 'sent', 'sent_individually', 'drive'
);
CREATE TYPE invoicing_company AS ENUM ('anmara', 'morwell', 'onopko');
CREATE TYPE payment_method AS ENUM ('PPD', 'PUE');
";

const TABLES_SQL: &str = r"
CREATE TABLE partners (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Staff members who manage client accounts.
CREATE TABLE executives (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- business_name is stored trimmed and uppercased; name_key additionally
-- collapses internal whitespace and identifies the release group.
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    business_name VARCHAR(255) NOT NULL,
    name_key VARCHAR(255) NOT NULL,
    ac ac_category,
    service VARCHAR(120) NOT NULL DEFAULT '',
    executive_id UUID REFERENCES executives(id) ON DELETE SET NULL,
    secondary_executive_id UUID REFERENCES executives(id) ON DELETE SET NULL,
    support_executive_id UUID REFERENCES executives(id) ON DELETE SET NULL,
    -- Up to twelve slots of 100% each.
    service_commission_rate NUMERIC(9, 6) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_clients_rate_non_negative CHECK (service_commission_rate >= 0)
);

CREATE TABLE client_commission_slots (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    position SMALLINT NOT NULL,
    partner_id UUID REFERENCES partners(id) ON DELETE SET NULL,
    percentage NUMERIC(7, 6),
    CONSTRAINT uq_client_slot_position UNIQUE (client_id, position),
    CONSTRAINT chk_slot_position CHECK (position BETWEEN 1 AND 12),
    CONSTRAINT chk_slot_percentage CHECK (percentage IS NULL OR percentage BETWEEN 0 AND 1)
);

CREATE TABLE transfers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE RESTRICT,
    transfer_date DATE NOT NULL,
    executive_id UUID REFERENCES executives(id) ON DELETE SET NULL,
    secondary_executive_id UUID REFERENCES executives(id) ON DELETE SET NULL,
    support_executive_id UUID REFERENCES executives(id) ON DELETE SET NULL,
    amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    payment_status payment_status NOT NULL DEFAULT 'pending',
    process_status process_status NOT NULL DEFAULT 'pending',
    period_label VARCHAR(50),
    period_status period_status NOT NULL DEFAULT 'pending',
    service VARCHAR(120) NOT NULL DEFAULT '',
    invoicing_company invoicing_company,
    invoice_number VARCHAR(100),
    fee_invoice_number VARCHAR(100),
    payment_method payment_method,
    invoice_requested BOOLEAN NOT NULL DEFAULT false,
    comments TEXT,
    commission_rate NUMERIC(9, 4) NOT NULL DEFAULT 0,
    commission_amount NUMERIC(16, 2) NOT NULL DEFAULT 0,
    commission_amount_with_tax NUMERIC(16, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transfers_amount_non_negative CHECK (amount >= 0)
);

CREATE TABLE commissions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transfer_id UUID NOT NULL REFERENCES transfers(id) ON DELETE CASCADE,
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    partner_id UUID NOT NULL REFERENCES partners(id) ON DELETE RESTRICT,
    slot SMALLINT NOT NULL,
    service VARCHAR(120) NOT NULL DEFAULT '',
    percentage NUMERIC(7, 6) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    period_month SMALLINT NOT NULL,
    period_year INTEGER NOT NULL,
    releasable_from DATE NOT NULL,
    released BOOLEAN NOT NULL DEFAULT false,
    transfer_date DATE NOT NULL,
    transfer_payment_status payment_status NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_commissions_month CHECK (period_month BETWEEN 1 AND 12),
    CONSTRAINT chk_commissions_percentage CHECK (percentage > 0 AND percentage <= 1)
);
";

const INDEXES_SQL: &str = r"
-- Release group lookup
CREATE INDEX idx_clients_name_key ON clients(name_key);

CREATE INDEX idx_transfers_client_date ON transfers(client_id, transfer_date);
CREATE INDEX idx_transfers_executive ON transfers(executive_id);

CREATE INDEX idx_commissions_transfer ON commissions(transfer_id);
CREATE INDEX idx_commissions_client_period ON commissions(client_id, period_year, period_month);
CREATE INDEX idx_commissions_partner ON commissions(partner_id, period_year, period_month);

-- Batch scan for pending periods
CREATE INDEX idx_commissions_unreleased ON commissions(period_year, period_month) WHERE NOT released;
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS commissions CASCADE;
DROP TABLE IF EXISTS transfers CASCADE;
DROP TABLE IF EXISTS client_commission_slots CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TABLE IF EXISTS executives CASCADE;
DROP TABLE IF EXISTS partners CASCADE;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS invoicing_company;
DROP TYPE IF EXISTS period_status;
DROP TYPE IF EXISTS process_status;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS ac_category;
";
