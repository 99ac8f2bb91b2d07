//! Database seeder for Benchmark development and testing.
//!
//! Seeds one project per topology, a worker for each production role,
//! and a handful of queued orders so the start-next flow has
//! something to pull.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use benchmark_db::entities::{
    orders, projects,
    sea_orm_active_enums::{OrderPriority, UserRole, WorkflowState, WorkflowType},
    users,
};

/// FP project ID (consistent for all seeds)
const FP_PROJECT_ID: &str = "00000000-0000-0000-0000-000000000001";
/// PH project ID (consistent for all seeds)
const PH_PROJECT_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = benchmark_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding projects...");
    seed_projects(&db).await;

    println!("Seeding workers...");
    seed_workers(&db).await;

    println!("Seeding orders...");
    seed_orders(&db).await;

    println!("Seeding complete!");
}

fn fp_project_id() -> Uuid {
    Uuid::parse_str(FP_PROJECT_ID).unwrap()
}

fn ph_project_id() -> Uuid {
    Uuid::parse_str(PH_PROJECT_ID).unwrap()
}

/// Seeds one project per topology.
async fn seed_projects(db: &DatabaseConnection) {
    let seeds = [
        (
            fp_project_id(),
            "Floor Plans",
            "FP",
            WorkflowType::Fp3Layer,
        ),
        (
            ph_project_id(),
            "Photo Enhancement",
            "PH",
            WorkflowType::Ph2Layer,
        ),
    ];

    for (id, name, code, workflow_type) in seeds {
        if projects::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Project {code} already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let project = projects::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            workflow_type: Set(workflow_type),
            sla_hours: Set(24),
            wip_cap: Set(3),
            daily_target: Set(8),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = project.insert(db).await {
            eprintln!("Failed to insert project {code}: {e}");
        } else {
            println!("  Created project: {name}");
        }
    }
}

/// Seeds one worker per production role plus an operations manager.
async fn seed_workers(db: &DatabaseConnection) {
    let seeds = [
        (fp_project_id(), "Dina Drawer", "dina@benchmark.dev", UserRole::Drawer),
        (fp_project_id(), "Carl Checker", "carl@benchmark.dev", UserRole::Checker),
        (fp_project_id(), "Quinn QA", "quinn@benchmark.dev", UserRole::Qa),
        (ph_project_id(), "Desmond Designer", "desmond@benchmark.dev", UserRole::Designer),
        (ph_project_id(), "Queenie QA", "queenie@benchmark.dev", UserRole::Qa),
        (fp_project_id(), "Olive Ops", "olive@benchmark.dev", UserRole::OperationsManager),
    ];

    let mut inserted = 0;
    for (project_id, name, email, role) in seeds {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(Some(project_id)),
            team_id: Set(None),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            role: Set(role),
            is_active: Set(true),
            is_absent: Set(false),
            daily_target: Set(8),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = user.insert(db).await {
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert worker {email}: {e}");
            }
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} workers");
}

/// Seeds queued orders with mixed priorities so ranking is visible.
async fn seed_orders(db: &DatabaseConnection) {
    let seeds = [
        ("FP-1001", OrderPriority::Urgent, 4),
        ("FP-1002", OrderPriority::Normal, 3),
        ("FP-1003", OrderPriority::Normal, 2),
        ("FP-1004", OrderPriority::High, 1),
        ("FP-1005", OrderPriority::Low, 0),
    ];

    let mut inserted = 0;
    for (order_number, priority, age_hours) in seeds {
        let queued_at = Utc::now() - Duration::hours(age_hours);
        let now = Utc::now().into();
        let order = orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(fp_project_id()),
            team_id: Set(None),
            order_number: Set(order_number.to_string()),
            workflow_type: Set(WorkflowType::Fp3Layer),
            workflow_state: Set(WorkflowState::QueuedDraw),
            priority: Set(priority),
            assigned_to: Set(None),
            queued_at: Set(Some(queued_at.into())),
            previous_state: Set(None),
            hold_reason: Set(None),
            attempt_draw: Set(0),
            attempt_check: Set(0),
            attempt_qa: Set(0),
            attempt_design: Set(0),
            recheck_count: Set(0),
            rejected_by: Set(None),
            rejected_at: Set(None),
            rejection_type: Set(None),
            rejection_reason: Set(None),
            cancel_reason: Set(None),
            received_at: Set(queued_at.into()),
            started_at: Set(None),
            completed_at: Set(None),
            delivered_at: Set(None),
            due_date: Set(None),
            metadata: Set(Some(serde_json::json!({ "source": "seeder" }))),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = order.insert(db).await {
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert order {order_number}: {e}");
            }
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} orders");
}
