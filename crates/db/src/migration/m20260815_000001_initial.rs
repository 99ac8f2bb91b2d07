//! Initial schema: projects, teams, users, orders, work items,
//! invoices and month locks.

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
CREATE TYPE workflow_type AS ENUM ('FP_3_LAYER', 'PH_2_LAYER');

CREATE TYPE workflow_state AS ENUM (
    'RECEIVED',
    'QUEUED_DRAW', 'IN_DRAW', 'SUBMITTED_DRAW',
    'QUEUED_CHECK', 'IN_CHECK', 'REJECTED_BY_CHECK', 'SUBMITTED_CHECK',
    'QUEUED_QA', 'IN_QA', 'REJECTED_BY_QA', 'APPROVED_QA',
    'QUEUED_DESIGN', 'IN_DESIGN', 'SUBMITTED_DESIGN',
    'DELIVERED', 'ON_HOLD', 'CANCELLED'
);

CREATE TYPE order_priority AS ENUM ('low', 'normal', 'high', 'urgent');

CREATE TYPE user_role AS ENUM (
    'ceo', 'director', 'operations_manager', 'qa', 'checker',
    'drawer', 'designer', 'admin', 'accounts_manager'
);

CREATE TYPE invoice_status AS ENUM ('draft', 'prepared', 'approved', 'issued', 'sent');

CREATE TYPE work_item_status AS ENUM ('assigned', 'completed', 'rejected', 'released');
";

const TABLES_SQL: &str = r"
CREATE TABLE projects (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    code VARCHAR(32) NOT NULL UNIQUE,
    workflow_type workflow_type NOT NULL,
    sla_hours INTEGER NOT NULL DEFAULT 24,
    wip_cap INTEGER NOT NULL DEFAULT 3,
    daily_target INTEGER NOT NULL DEFAULT 10,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_wip_cap_positive CHECK (wip_cap > 0),
    CONSTRAINT chk_sla_hours_positive CHECK (sla_hours > 0)
);

CREATE TABLE teams (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE users (
    id UUID PRIMARY KEY,
    project_id UUID REFERENCES projects(id) ON DELETE SET NULL,
    team_id UUID REFERENCES teams(id) ON DELETE SET NULL,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    role user_role NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    is_absent BOOLEAN NOT NULL DEFAULT FALSE,
    daily_target INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE orders (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    team_id UUID REFERENCES teams(id) ON DELETE SET NULL,
    order_number VARCHAR(64) NOT NULL UNIQUE,
    workflow_type workflow_type NOT NULL,
    workflow_state workflow_state NOT NULL DEFAULT 'RECEIVED',
    priority order_priority NOT NULL DEFAULT 'normal',
    assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
    queued_at TIMESTAMPTZ,
    previous_state workflow_state,
    hold_reason TEXT,
    attempt_draw INTEGER NOT NULL DEFAULT 0,
    attempt_check INTEGER NOT NULL DEFAULT 0,
    attempt_qa INTEGER NOT NULL DEFAULT 0,
    attempt_design INTEGER NOT NULL DEFAULT 0,
    recheck_count INTEGER NOT NULL DEFAULT 0,
    rejected_by UUID REFERENCES users(id) ON DELETE SET NULL,
    rejected_at TIMESTAMPTZ,
    rejection_type VARCHAR(32),
    rejection_reason TEXT,
    cancel_reason TEXT,
    received_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    started_at TIMESTAMPTZ,
    completed_at TIMESTAMPTZ,
    delivered_at TIMESTAMPTZ,
    due_date TIMESTAMPTZ,
    metadata JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_attempts_non_negative CHECK (
        attempt_draw >= 0 AND attempt_check >= 0 AND attempt_qa >= 0
        AND attempt_design >= 0 AND recheck_count >= 0
    )
);

CREATE TABLE work_items (
    id UUID PRIMARY KEY,
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    stage VARCHAR(16) NOT NULL,
    status work_item_status NOT NULL DEFAULT 'assigned',
    attempt_number INTEGER NOT NULL DEFAULT 0,
    recorded_state workflow_state,
    comments TEXT,
    rejection_code VARCHAR(32),
    rework_reason TEXT,
    started_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    finished_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    invoice_number VARCHAR(64) UNIQUE,
    period VARCHAR(7) NOT NULL,
    status invoice_status NOT NULL DEFAULT 'draft',
    total NUMERIC(14, 2) NOT NULL DEFAULT 0,
    currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    created_by UUID NOT NULL REFERENCES users(id),
    prepared_by UUID REFERENCES users(id),
    prepared_at TIMESTAMPTZ,
    approved_by UUID REFERENCES users(id),
    approved_at TIMESTAMPTZ,
    issued_by UUID REFERENCES users(id),
    issued_at TIMESTAMPTZ,
    sent_by UUID REFERENCES users(id),
    sent_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE month_locks (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    period VARCHAR(7) NOT NULL,
    is_locked BOOLEAN NOT NULL DEFAULT FALSE,
    counts JSONB NOT NULL,
    locked_by UUID REFERENCES users(id),
    locked_at TIMESTAMPTZ,
    unlocked_by UUID REFERENCES users(id),
    unlocked_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_month_locks_project_period UNIQUE (project_id, period)
);
";

const INDEXES_SQL: &str = r"
-- Queue scans: stage queues are filtered by project, state and hold.
CREATE INDEX idx_orders_project_state ON orders(project_id, workflow_state);

-- The start-next candidate scan.
CREATE INDEX idx_orders_queue_claim
    ON orders(project_id, workflow_state, priority, queued_at, id)
    WHERE assigned_to IS NULL;

-- A worker's current orders.
CREATE INDEX idx_orders_assigned ON orders(assigned_to) WHERE assigned_to IS NOT NULL;

-- Period count queries.
CREATE INDEX idx_orders_received_at ON orders(project_id, received_at);
CREATE INDEX idx_orders_delivered_at ON orders(project_id, delivered_at)
    WHERE delivered_at IS NOT NULL;

CREATE INDEX idx_work_items_order ON work_items(order_id, created_at);
CREATE INDEX idx_work_items_user ON work_items(user_id, started_at DESC);
CREATE INDEX idx_work_items_user_finished ON work_items(user_id, finished_at)
    WHERE finished_at IS NOT NULL;

CREATE INDEX idx_users_project_role ON users(project_id, role) WHERE is_active;

CREATE INDEX idx_invoices_project ON invoices(project_id, period);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS month_locks CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS work_items CASCADE;
DROP TABLE IF EXISTS orders CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS teams CASCADE;
DROP TABLE IF EXISTS projects CASCADE;
DROP TYPE IF EXISTS work_item_status;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS user_role;
DROP TYPE IF EXISTS order_priority;
DROP TYPE IF EXISTS workflow_state;
DROP TYPE IF EXISTS workflow_type;
";
