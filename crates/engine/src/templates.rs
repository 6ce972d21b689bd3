//! Auto-order template management.
//!
//! Writes lock the owning user's row so two concurrent template writes for
//! the same user cannot both pass the wildcard/weekday conflict check.

use serde_json::json;
use bento_core::audit::{actions, tables};
use bento_core::auto_order::check_template_conflict;
use bento_core::error::CoreError;
use bento_core::ordering::validate_quantity;
use bento_core::principal::ActingPrincipal;
use bento_core::types::DbId;
use bento_db::models::auto_order::{AutoOrderTemplate, TemplateInput};
use bento_db::repositories::{MenuItemRepo, TemplateRepo, UserRepo};
use sqlx::PgConnection;

use crate::context::EngineContext;
use crate::error::{map_unique, EngineResult};

#[derive(Clone)]
pub struct TemplateService {
    ctx: EngineContext,
}

impl TemplateService {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Templates of `user_id`, or of the caller when `None`.
    pub async fn list(
        &self,
        principal: &ActingPrincipal,
        user_id: Option<DbId>,
    ) -> EngineResult<Vec<AutoOrderTemplate>> {
        let owner = target_user(principal, user_id)?;
        principal.require_owner_or_admin(owner)?;
        Ok(TemplateRepo::list_for_user(&self.ctx.pool, owner).await?)
    }

    pub async fn create(
        &self,
        principal: &ActingPrincipal,
        input: &TemplateInput,
    ) -> EngineResult<AutoOrderTemplate> {
        validate_quantity(input.quantity)?;
        let owner = target_user(principal, input.user_id)?;
        principal.require_owner_or_admin(owner)?;

        let mut tx = self.ctx.pool.begin().await?;
        lock_owner(&mut tx, owner).await?;
        ensure_menu_item(&mut tx, input.menu_item_id).await?;

        let existing: Vec<_> = TemplateRepo::list_for_user(&mut *tx, owner)
            .await?
            .iter()
            .map(AutoOrderTemplate::slot)
            .collect();
        check_template_conflict(&existing, None, input.day_of_week)?;

        let template = TemplateRepo::create(
            &mut *tx,
            owner,
            input.menu_item_id,
            input.quantity,
            input.day_of_week,
        )
        .await
        .map_err(|e| map_unique(e, template_conflict))?;
        tx.commit().await?;

        self.audit(principal, actions::TEMPLATE_CREATE, &template);
        Ok(template)
    }

    pub async fn update(
        &self,
        principal: &ActingPrincipal,
        template_id: DbId,
        input: &TemplateInput,
    ) -> EngineResult<AutoOrderTemplate> {
        validate_quantity(input.quantity)?;

        let mut tx = self.ctx.pool.begin().await?;
        let current = TemplateRepo::find_by_id(&mut *tx, template_id)
            .await?
            .ok_or(template_not_found(template_id))?;
        principal.require_owner_or_admin(current.user_id)?;
        lock_owner(&mut tx, current.user_id).await?;
        ensure_menu_item(&mut tx, input.menu_item_id).await?;

        let existing: Vec<_> = TemplateRepo::list_for_user(&mut *tx, current.user_id)
            .await?
            .iter()
            .map(AutoOrderTemplate::slot)
            .collect();
        check_template_conflict(&existing, Some(template_id), input.day_of_week)?;

        let template = TemplateRepo::update(
            &mut *tx,
            template_id,
            input.menu_item_id,
            input.quantity,
            input.day_of_week,
        )
        .await
        .map_err(|e| map_unique(e, template_conflict))?;
        tx.commit().await?;

        self.audit(principal, actions::TEMPLATE_UPDATE, &template);
        Ok(template)
    }

    pub async fn delete(&self, principal: &ActingPrincipal, template_id: DbId) -> EngineResult<()> {
        let current = TemplateRepo::find_by_id(&self.ctx.pool, template_id)
            .await?
            .ok_or(template_not_found(template_id))?;
        principal.require_owner_or_admin(current.user_id)?;

        if !TemplateRepo::delete(&self.ctx.pool, template_id).await? {
            return Err(template_not_found(template_id).into());
        }
        self.audit(principal, actions::TEMPLATE_DELETE, &current);
        Ok(())
    }

    fn audit(&self, principal: &ActingPrincipal, action: &str, template: &AutoOrderTemplate) {
        self.ctx.audit(
            principal,
            action,
            tables::AUTO_ORDER_TEMPLATES,
            Some(template.id),
            json!({
                "user_id": template.user_id,
                "menu_item_id": template.menu_item_id,
                "quantity": template.quantity,
                "day_of_week": template.day_of_week,
            }),
        );
    }
}

fn target_user(principal: &ActingPrincipal, user_id: Option<DbId>) -> Result<DbId, CoreError> {
    user_id
        .or(principal.actor_id)
        .ok_or_else(|| CoreError::Validation("user_id is required".into()))
}

async fn lock_owner(conn: &mut PgConnection, user_id: DbId) -> EngineResult<()> {
    UserRepo::lock_for_update(conn, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;
    Ok(())
}

async fn ensure_menu_item(conn: &mut PgConnection, menu_item_id: DbId) -> EngineResult<()> {
    MenuItemRepo::find_by_id(conn, menu_item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MenuItem",
            id: menu_item_id,
        })?;
    Ok(())
}

fn template_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "AutoOrderTemplate",
        id,
    }
}

fn template_conflict(constraint: &str) -> Option<CoreError> {
    constraint
        .starts_with("uq_auto_order_templates")
        .then(|| CoreError::Conflict("A template for this weekday already exists".into()))
}
