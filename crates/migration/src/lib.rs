pub use sea_orm_migration::prelude::*;

mod m20261018_120000_transactions;
mod m20261018_130000_goals;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_120000_transactions::Migration),
            Box::new(m20261018_130000_goals::Migration),
        ]
    }
}
