// Admin CRUD wrappers for users, roles, permissions, and teams. All four
// resources share the paginated list shape keyed by the collection name.
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use super::auth::Ack;
use super::ApiClient;
use crate::error::ClientError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Normalized page shape handed to UI components, regardless of which
/// collection key the backend used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub meta: Pagination,
}

/// A resource payload plus its server-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceWithId<T> {
    pub id: String,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub email: String,
    pub roles: Vec<String>,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePayload {
    pub name: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionPayload {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPayload {
    pub name: String,
}

/// Fetch one page of an admin collection and normalize the envelope data
/// (`{<collection>: [...], meta: {...}}`) into [`Paged`].
async fn list_resource<T: DeserializeOwned>(
    client: &ApiClient,
    collection: &str,
    page: u32,
    per_page: u32,
) -> Result<Paged<ResourceWithId<T>>, ClientError> {
    let data: Value = client
        .get(&format!("/admin/{collection}?page={page}&per_page={per_page}"))
        .await?;

    let items = serde_json::from_value(data.get(collection).cloned().unwrap_or(json!([])))?;
    let meta = serde_json::from_value(
        data.get("meta")
            .cloned()
            .unwrap_or(json!({ "page": page, "per_page": per_page })),
    )?;

    Ok(Paged { items, meta })
}

pub async fn list_users(
    client: &ApiClient,
    page: u32,
    per_page: u32,
) -> Result<Paged<ResourceWithId<UserPayload>>, ClientError> {
    list_resource(client, "users", page, per_page).await
}

pub async fn create_user(
    client: &ApiClient,
    payload: &UserPayload,
) -> Result<ResourceWithId<UserPayload>, ClientError> {
    client.post("/admin/users", payload).await
}

pub async fn update_user(
    client: &ApiClient,
    id: &str,
    payload: &UserPayload,
) -> Result<ResourceWithId<UserPayload>, ClientError> {
    client.put(&format!("/admin/users/{id}"), payload).await
}

pub async fn delete_user(client: &ApiClient, id: &str) -> Result<Ack, ClientError> {
    let _: Value = client.delete(&format!("/admin/users/{id}")).await?;
    Ok(Ack {
        message: "User deleted".to_string(),
    })
}

pub async fn list_roles(
    client: &ApiClient,
    page: u32,
    per_page: u32,
) -> Result<Paged<ResourceWithId<RolePayload>>, ClientError> {
    list_resource(client, "roles", page, per_page).await
}

pub async fn create_role(
    client: &ApiClient,
    payload: &RolePayload,
) -> Result<ResourceWithId<RolePayload>, ClientError> {
    client.post("/admin/roles", payload).await
}

pub async fn update_role(
    client: &ApiClient,
    id: &str,
    payload: &RolePayload,
) -> Result<ResourceWithId<RolePayload>, ClientError> {
    client.put(&format!("/admin/roles/{id}"), payload).await
}

pub async fn delete_role(client: &ApiClient, id: &str) -> Result<Ack, ClientError> {
    let _: Value = client.delete(&format!("/admin/roles/{id}")).await?;
    Ok(Ack {
        message: "Role deleted".to_string(),
    })
}

pub async fn list_permissions(
    client: &ApiClient,
    page: u32,
    per_page: u32,
) -> Result<Paged<ResourceWithId<PermissionPayload>>, ClientError> {
    list_resource(client, "permissions", page, per_page).await
}

pub async fn create_permission(
    client: &ApiClient,
    payload: &PermissionPayload,
) -> Result<ResourceWithId<PermissionPayload>, ClientError> {
    client.post("/admin/permissions", payload).await
}

pub async fn update_permission(
    client: &ApiClient,
    id: &str,
    payload: &PermissionPayload,
) -> Result<ResourceWithId<PermissionPayload>, ClientError> {
    client.put(&format!("/admin/permissions/{id}"), payload).await
}

pub async fn delete_permission(client: &ApiClient, id: &str) -> Result<Ack, ClientError> {
    let _: Value = client.delete(&format!("/admin/permissions/{id}")).await?;
    Ok(Ack {
        message: "Permission deleted".to_string(),
    })
}

pub async fn list_teams(
    client: &ApiClient,
    page: u32,
    per_page: u32,
) -> Result<Paged<ResourceWithId<TeamPayload>>, ClientError> {
    list_resource(client, "teams", page, per_page).await
}

pub async fn create_team(
    client: &ApiClient,
    payload: &TeamPayload,
) -> Result<ResourceWithId<TeamPayload>, ClientError> {
    client.post("/admin/teams", payload).await
}

pub async fn update_team(
    client: &ApiClient,
    id: &str,
    payload: &TeamPayload,
) -> Result<ResourceWithId<TeamPayload>, ClientError> {
    client.put(&format!("/admin/teams/{id}"), payload).await
}

pub async fn delete_team(client: &ApiClient, id: &str) -> Result<Ack, ClientError> {
    let _: Value = client.delete(&format!("/admin/teams/{id}")).await?;
    Ok(Ack {
        message: "Team deleted".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_with_id_flattens_payload() {
        let value = json!({"id": "t-1", "name": "Platform"});
        let team: ResourceWithId<TeamPayload> = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(team.id, "t-1");
        assert_eq!(team.payload.name, "Platform");
        assert_eq!(serde_json::to_value(&team).unwrap(), value);
    }

    #[test]
    fn test_pagination_total_is_optional() {
        let meta: Pagination = serde_json::from_value(json!({"page": 2, "per_page": 20})).unwrap();
        assert_eq!(meta.page, 2);
        assert_eq!(meta.total, None);
    }
}
