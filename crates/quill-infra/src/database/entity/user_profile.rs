//! User profile entity for SeaORM. Users themselves live with the identity
//! provider, so `user_id` has no foreign key.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub org: String,
    pub telephone: String,
    pub updated_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::UserProfile {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            org: model.org,
            telephone: model.telephone,
            updated_time: model.updated_time.into(),
        }
    }
}

impl From<quill_core::domain::UserProfile> for ActiveModel {
    fn from(profile: quill_core::domain::UserProfile) -> Self {
        Self {
            user_id: Set(profile.user_id),
            org: Set(profile.org),
            telephone: Set(profile.telephone),
            updated_time: Set(profile.updated_time.into()),
        }
    }
}
