use std::collections::BTreeSet;
use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Json, Object, SimpleObject, ID};
use decliker_shared::{features, models};

use crate::assets::Assets;

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlDecliker {
    pub id: ID,
    pub name: String,
    pub jobs: Vec<String>,
    /// GeoJSON geometry, passed through untouched.
    pub geometry: Json<geojson::Geometry>,
}

impl From<&models::Decliker> for GqlDecliker {
    fn from(d: &models::Decliker) -> Self {
        GqlDecliker {
            id: ID(d.id.clone()),
            name: d.name.clone(),
            jobs: d.jobs.clone(),
            geometry: Json(d.geometry.clone()),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlProfession {
    pub label: String,
    pub value: String,
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All declikers, optionally narrowed to those offering any of `professions`.
    async fn declikers(
        &self,
        ctx: &Context<'_>,
        professions: Option<Vec<String>>,
    ) -> async_graphql::Result<Vec<GqlDecliker>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let selected: BTreeSet<String> = professions.unwrap_or_default().into_iter().collect();
        Ok(features::filter_declikers(&assets.declikers, &selected)
            .into_iter()
            .map(GqlDecliker::from)
            .collect())
    }

    async fn decliker(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<GqlDecliker>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets.find_decliker(&id).map(GqlDecliker::from))
    }

    async fn professions(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlProfession>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .professions
            .iter()
            .map(|p| GqlProfession {
                label: p.label.clone(),
                value: p.value.clone(),
            })
            .collect())
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>) -> Schema {
    async_graphql::Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(assets)
        .finish()
}
