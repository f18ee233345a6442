use clap::{Parser, Subcommand};
use learned::analytics::YearLevel;
use learned::model::entity::{
    StudentCreate, StudentEntity, TeacherCreate, TeacherEntity, UserEntity, UserEntityCreate,
};
use learned::model::{CrudRepository, DbConnection, ModelManager};
use learned::web::{AuthenticatedUser, UserRole};

mod seed;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the learning DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Fill the database with a demo school
    Seed {
        /// Number of students, split evenly between Year 11 and Year 12
        #[arg(long, default_value_t = 20)]
        students: usize,
        /// Wipe every table before seeding
        #[arg(long, default_value_t = false)]
        reset: bool,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        /// STUDENT, TEACHER or ADMIN
        #[arg(long, default_value = "STUDENT")]
        role: String,
        #[arg(long, default_value = "YEAR_11")]
        year_level: YearLevel,
        #[arg(long, default_value = "General")]
        department: String,
    },
}

#[tokio::main]
async fn main() -> learned::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let database_uri = std::env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL is not set"))?;
    let db_con = DbConnection::connect(&database_uri)?;
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                email,
                name,
                password,
                role,
                year_level,
                department,
            } => {
                let role = UserRole::from(role.as_str());
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreate {
                        email,
                        name,
                        password_hash: learned::auth::hash_password(&password)?,
                        role,
                    },
                )
                .await?;
                println!("User created: {:?}", user);

                match role {
                    UserRole::Student => {
                        let student = StudentEntity::create(
                            &mm,
                            &actor,
                            StudentCreate {
                                user_id: user.id(),
                                year_level,
                                atar: None,
                            },
                        )
                        .await?;
                        println!("Student profile created: {:?}", student);
                    }
                    UserRole::Teacher => {
                        let teacher = TeacherEntity::create(
                            &mm,
                            &actor,
                            TeacherCreate {
                                user_id: user.id(),
                                department,
                                specialties: vec![],
                            },
                        )
                        .await?;
                        println!("Teacher profile created: {:?}", teacher);
                    }
                    UserRole::Admin => {}
                }
            }
        },

        Commands::Seed { students, reset } => {
            if reset {
                seed::reset(&mm).await?;
                println!("Cleared existing data");
            }
            let summary = seed::run(&mm, students).await?;
            println!("{summary}");
        }
    }

    Ok(())
}
