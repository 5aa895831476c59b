//! Flag capture.
//!
//! Three sequential Admin API calls:
//!
//! 1. look up the flag product by handle (fatal on failure)
//! 2. disable inventory tracking on its first variant (warning on failure)
//! 3. search the operator's orders for that variant (soft miss on failure)
//!
//! A soft miss is not an error: the report carries [`ManualInstructions`] that
//! tell the operator how to place the order by hand.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::clients::graphql::{GraphqlClient, GraphqlError, Variables};
use crate::config::{StorePassword, TasksConfig};
use crate::tasks::{Connection, IdOnly, StepOutcome};

/// Handle of the flag product.
pub const FLAG_PRODUCT_HANDLE: &str = "the-videographer-snowboard";

/// Number of orders inspected by the search.
pub const ORDER_SEARCH_LIMIT: u32 = 10;

const PRODUCT_BY_HANDLE_QUERY: &str = r"
query GetProductByHandle($handle: String!) {
  product: productByHandle(handle: $handle) {
    id
    title
    handle
    variants(first: 1) {
      edges {
        node {
          id
          inventoryItem {
            id
          }
        }
      }
    }
  }
}
";

const INVENTORY_ITEM_UPDATE_MUTATION: &str = r"
mutation UpdateInventoryItem($id: ID!, $input: InventoryItemInput!) {
  inventoryItemUpdate(id: $id, input: $input) {
    inventoryItem {
      id
      tracked
    }
    userErrors {
      field
      message
    }
  }
}
";

const ORDERS_BY_EMAIL_QUERY: &str = r"
query GetOrdersByEmail($first: Int!, $query: String!) {
  orders(first: $first, query: $query) {
    edges {
      node {
        id
        name
        email
        lineItems(first: 10) {
          edges {
            node {
              variant {
                id
              }
            }
          }
        }
      }
    }
  }
}
";

/// Settings for [`capture_the_flag`].
#[derive(Clone, Debug)]
pub struct FlagCaptureOptions {
    /// Handle of the product to look for.
    pub product_handle: String,
}

impl Default for FlagCaptureOptions {
    fn default() -> Self {
        Self {
            product_handle: FLAG_PRODUCT_HANDLE.to_string(),
        }
    }
}

/// The flag product and the IDs the later steps need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductInfo {
    /// Product global ID.
    pub product_id: String,
    /// Product title.
    pub title: String,
    /// Product handle.
    pub handle: String,
    /// Global ID of the first variant.
    pub variant_id: String,
    /// Global ID of the first variant's inventory item.
    pub inventory_item_id: String,
}

/// Fatal errors: the workflow stops after the product lookup.
#[derive(Debug, Error)]
pub enum FlagCaptureError {
    /// The lookup query failed.
    #[error("failed to find flag product: GraphQL query failed: {0}")]
    LookupFailed(#[source] GraphqlError),

    /// The lookup response did not have the expected shape.
    #[error("failed to find flag product: failed to parse response: {0}")]
    LookupDecode(#[source] serde_json::Error),

    /// No product has the requested handle.
    #[error("failed to find flag product: no product found with handle: {handle}")]
    ProductNotFound {
        /// The handle that was searched for.
        handle: String,
    },

    /// The product exists but has no variants.
    #[error("failed to find flag product: no variants found for product {handle}")]
    NoVariants {
        /// The product handle.
        handle: String,
    },
}

/// Reasons the inventory tracking update did not apply.
#[derive(Debug, Error)]
pub enum InventoryUpdateError {
    /// The mutation request failed.
    #[error("GraphQL mutation failed: {0}")]
    MutationFailed(#[source] GraphqlError),

    /// The mutation response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The service rejected the input.
    #[error("failed to update inventory tracking: {message}")]
    UserError {
        /// Message of the first user error.
        message: String,
    },
}

/// Reasons the order search did not find the flag product.
#[derive(Debug, Error)]
pub enum SearchMiss {
    /// No operator email is configured, so there is nothing to search by.
    #[error("no operator email configured")]
    NoOperatorEmail,

    /// The search query failed.
    #[error("GraphQL query failed: {0}")]
    QueryFailed(#[source] GraphqlError),

    /// The search response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The operator has no orders.
    #[error("no orders found for email: {email}")]
    NoOrders {
        /// The email that was searched.
        email: String,
    },

    /// Orders exist but none contains the flag variant.
    #[error("no orders found containing the flag product")]
    NoMatchingOrder,
}

/// The order that contains the flag product.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderMatch {
    /// Order global ID.
    pub order_id: String,
    /// Order name, e.g. `#1001`.
    pub name: String,
}

/// What the operator has to do by hand when no order was found.
#[derive(Clone, Debug)]
pub struct ManualInstructions {
    /// Storefront URL.
    pub store_url: String,
    /// Storefront password, if configured.
    pub store_password: Option<StorePassword>,
    /// Email to check out with, if configured.
    pub operator_email: Option<String>,
}

impl ManualInstructions {
    /// Builds the instructions from the task configuration.
    #[must_use]
    pub fn from_config(config: &TasksConfig) -> Self {
        Self {
            store_url: config.store_url().to_string(),
            store_password: config.store_password().cloned(),
            operator_email: config.operator_email().map(String::from),
        }
    }
}

impl fmt::Display for ManualInstructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = self
            .store_password
            .as_ref()
            .map_or("not set", AsRef::as_ref);
        let email = self.operator_email.as_deref().unwrap_or("not set");

        writeln!(f, "To capture the flag, place an order manually:")?;
        writeln!(f, "1. Visit: {} (password: {password})", self.store_url)?;
        writeln!(f, "2. Search for the flag product and add to cart")?;
        writeln!(f, "3. Checkout with email: {email}")?;
        write!(f, "4. Complete the order")
    }
}

/// How the workflow ended.
#[derive(Debug)]
pub enum FlagCaptureOutcome {
    /// An existing order contains the flag product.
    Captured(OrderMatch),
    /// No order was found; the operator has to place one.
    ManualFallback {
        /// Why the search missed.
        miss: SearchMiss,
        /// What to do instead.
        instructions: ManualInstructions,
    },
}

/// Report of a completed flag capture run.
#[derive(Debug)]
pub struct FlagCaptureReport {
    /// The product that was found.
    pub product: ProductInfo,
    /// Set when the inventory update did not apply.
    pub inventory_warning: Option<InventoryUpdateError>,
    /// Search result.
    pub outcome: FlagCaptureOutcome,
}

impl FlagCaptureReport {
    /// Returns `true` if an order containing the flag product was found.
    #[must_use]
    pub const fn is_captured(&self) -> bool {
        matches!(self.outcome, FlagCaptureOutcome::Captured(_))
    }
}

#[derive(Debug, Deserialize)]
struct ProductData {
    product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
struct ProductNode {
    id: String,
    title: String,
    handle: String,
    #[serde(default)]
    variants: Connection<VariantNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    id: String,
    inventory_item: IdOnly,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryItemUpdateData {
    inventory_item_update: Option<InventoryItemUpdatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryItemUpdatePayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct UserError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OrdersData {
    orders: Option<Connection<OrderNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderNode {
    id: String,
    name: String,
    #[serde(default)]
    line_items: Connection<LineItemNode>,
}

#[derive(Debug, Deserialize)]
struct LineItemNode {
    variant: Option<IdOnly>,
}

impl OrderNode {
    fn contains_variant(&self, variant_id: &str) -> bool {
        self.line_items
            .edges
            .iter()
            .any(|edge| edge.node.variant.as_ref().is_some_and(|v| v.id == variant_id))
    }
}

/// Runs the flag capture workflow.
///
/// # Errors
///
/// Only the product lookup is fatal. Inventory update problems are recorded
/// on the report; search misses and search failures both produce
/// [`FlagCaptureOutcome::ManualFallback`].
pub async fn capture_the_flag(
    client: &GraphqlClient,
    config: &TasksConfig,
    options: &FlagCaptureOptions,
) -> Result<FlagCaptureReport, FlagCaptureError> {
    let product = find_product_by_handle(client, &options.product_handle).await?;
    tracing::info!(title = %product.title, "found flag product");

    let inventory_warning =
        match disable_inventory_tracking(client, &product.inventory_item_id).await {
            StepOutcome::Success(()) => None,
            StepOutcome::Warning(e) => {
                tracing::warn!("inventory tracking update rejected: {e}");
                Some(e)
            }
            StepOutcome::Failed(e) => {
                tracing::warn!("inventory tracking update did not complete: {e}");
                Some(e)
            }
        };

    let outcome = match find_flag_order(client, &product.variant_id, config.operator_email()).await
    {
        StepOutcome::Success(order) => {
            tracing::info!(order = %order.name, "found order with flag product");
            FlagCaptureOutcome::Captured(order)
        }
        StepOutcome::Warning(miss) => {
            tracing::info!("no existing flag orders found: {miss}");
            FlagCaptureOutcome::ManualFallback {
                miss,
                instructions: ManualInstructions::from_config(config),
            }
        }
        StepOutcome::Failed(miss) => {
            tracing::warn!("order search failed, falling back to a manual order: {miss}");
            FlagCaptureOutcome::ManualFallback {
                miss,
                instructions: ManualInstructions::from_config(config),
            }
        }
    };

    Ok(FlagCaptureReport {
        product,
        inventory_warning,
        outcome,
    })
}

/// Looks up a product by handle and returns its first variant's IDs.
///
/// # Errors
///
/// Every failure is fatal to the workflow: the query fails or cannot be read,
/// no product has `handle`, or the product has no variants.
pub async fn find_product_by_handle(
    client: &GraphqlClient,
    handle: &str,
) -> Result<ProductInfo, FlagCaptureError> {
    let mut variables = Variables::new();
    variables.insert("handle".to_string(), handle.into());

    let response = client
        .query(PRODUCT_BY_HANDLE_QUERY, Some(&variables))
        .await
        .map_err(FlagCaptureError::LookupFailed)?;

    let data: ProductData = response.data_as().map_err(FlagCaptureError::LookupDecode)?;

    let product = data.product.ok_or_else(|| FlagCaptureError::ProductNotFound {
        handle: handle.to_string(),
    })?;

    let Some(variant) = product.variants.edges.into_iter().next().map(|e| e.node) else {
        return Err(FlagCaptureError::NoVariants {
            handle: product.handle,
        });
    };

    Ok(ProductInfo {
        product_id: product.id,
        title: product.title,
        handle: product.handle,
        variant_id: variant.id,
        inventory_item_id: variant.inventory_item.id,
    })
}

/// Sets `tracked: false` on an inventory item.
///
/// A rejected input is [`StepOutcome::Warning`] carrying the first user
/// error's message. A failed request or unreadable response is
/// [`StepOutcome::Failed`].
pub async fn disable_inventory_tracking(
    client: &GraphqlClient,
    inventory_item_id: &str,
) -> StepOutcome<(), InventoryUpdateError> {
    let mut variables = Variables::new();
    variables.insert("id".to_string(), inventory_item_id.into());
    variables.insert("input".to_string(), serde_json::json!({ "tracked": false }));

    let response = match client
        .query(INVENTORY_ITEM_UPDATE_MUTATION, Some(&variables))
        .await
    {
        Ok(response) => response,
        Err(e) => return StepOutcome::Failed(InventoryUpdateError::MutationFailed(e)),
    };

    let data: InventoryItemUpdateData = match response.data_as() {
        Ok(data) => data,
        Err(e) => return StepOutcome::Failed(InventoryUpdateError::Decode(e)),
    };

    let first_error = data
        .inventory_item_update
        .and_then(|payload| payload.user_errors.into_iter().next());
    if let Some(error) = first_error {
        return StepOutcome::Warning(InventoryUpdateError::UserError {
            message: error.message,
        });
    }

    tracing::info!(inventory_item = %inventory_item_id, "inventory tracking disabled");
    StepOutcome::Success(())
}

/// Searches the operator's orders for one containing `variant_id`.
///
/// Orders are scanned in the order returned, and line items within each order
/// likewise; the first match wins. Finding nothing, or having no email to
/// search by, is [`StepOutcome::Warning`]. A failed request or unreadable
/// response is [`StepOutcome::Failed`].
pub async fn find_flag_order(
    client: &GraphqlClient,
    variant_id: &str,
    operator_email: Option<&str>,
) -> StepOutcome<OrderMatch, SearchMiss> {
    let Some(email) = operator_email else {
        return StepOutcome::Warning(SearchMiss::NoOperatorEmail);
    };

    let mut variables = Variables::new();
    variables.insert("first".to_string(), ORDER_SEARCH_LIMIT.into());
    variables.insert("query".to_string(), format!("email:{email}").into());

    let response = match client.query(ORDERS_BY_EMAIL_QUERY, Some(&variables)).await {
        Ok(response) => response,
        Err(e) => return StepOutcome::Failed(SearchMiss::QueryFailed(e)),
    };

    let data: OrdersData = match response.data_as() {
        Ok(data) => data,
        Err(e) => return StepOutcome::Failed(SearchMiss::Decode(e)),
    };

    let orders: Vec<OrderNode> = data
        .orders
        .unwrap_or_default()
        .edges
        .into_iter()
        .map(|edge| edge.node)
        .collect();

    if orders.is_empty() {
        return StepOutcome::Warning(SearchMiss::NoOrders {
            email: email.to_string(),
        });
    }

    match orders.into_iter().find(|order| order.contains_variant(variant_id)) {
        Some(order) => StepOutcome::Success(OrderMatch {
            order_id: order.id,
            name: order.name,
        }),
        None => StepOutcome::Warning(SearchMiss::NoMatchingOrder),
    }
}
