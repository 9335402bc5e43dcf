pub use sea_orm_migration::prelude::*;

mod m20260712_093000_create_monitor_tables;
mod m20260729_141500_add_check_rules;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260712_093000_create_monitor_tables::Migration),
            Box::new(m20260729_141500_add_check_rules::Migration),
        ]
    }
}
