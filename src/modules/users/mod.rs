use async_trait::async_trait;
use saboga_db::DbError;
use saboga_kernel::settings::ExistingUserPolicy;
use saboga_kernel::{SeedCtx, SeedModule};

/// Creates the application's database user with a read/write role
pub struct UsersModule;

impl UsersModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for UsersModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeedModule for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn provision(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        let settings = &ctx.settings.seed_user;
        let user = settings.user_spec(ctx.store.database());

        match ctx.store.create_user(&user).await {
            Ok(()) => {
                tracing::info!(
                    module = self.name(),
                    user = %user.name,
                    role = %settings.role,
                    database = ctx.store.database(),
                    "seed user created"
                );
                Ok(())
            }
            Err(DbError::UserExists { .. }) => match settings.on_existing {
                ExistingUserPolicy::Skip => {
                    tracing::warn!(
                        module = self.name(),
                        user = %user.name,
                        "seed user already exists; leaving it unchanged"
                    );
                    Ok(())
                }
                ExistingUserPolicy::Update => {
                    ctx.store.update_user(&user).await?;
                    tracing::info!(module = self.name(), user = %user.name, "seed user updated");
                    Ok(())
                }
                ExistingUserPolicy::Fail => {
                    Err(DbError::user_exists(&user.name, ctx.store.database()).into())
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn verify(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        let user = ctx.settings.seed_user.user_spec(ctx.store.database());
        ctx.store.check_access(&user).await?;
        tracing::info!(module = self.name(), user = %user.name, "seed user can read and write");
        Ok(())
    }
}

/// Create a new instance of the users module
pub fn create_module() -> std::sync::Arc<dyn SeedModule> {
    std::sync::Arc::new(UsersModule::new())
}
