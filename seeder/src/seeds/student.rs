use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::student::{GRADE_RANGE, Model};
use fake::{Fake, faker::name::en::Name};
use sea_orm::{DatabaseConnection, DbErr};

/// Fixed demo roster, handy for trying the kiosk search by hand.
const DEMO_STUDENTS: &[(&str, i32)] = &[
    ("John Smith", 10),
    ("Amy Smithers", 9),
    ("Carla Jones", 12),
    ("Dev Patel", 7),
    ("Mei Chen", 8),
    ("Lucas Moreau", 11),
];

pub struct StudentSeeder {
    pub per_grade: usize,
}

#[async_trait]
impl Seeder for StudentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<usize, DbErr> {
        let mut created = 0;

        for (name, grade) in DEMO_STUDENTS {
            Model::create(db, name, *grade).await?;
            created += 1;
        }

        for grade in GRADE_RANGE {
            for _ in 0..self.per_grade {
                let name: String = Name().fake();
                Model::create(db, &name, grade).await?;
                created += 1;
            }
        }

        Ok(created)
    }
}
