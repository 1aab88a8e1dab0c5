//! Order endpoints: creation, cancellation and historical queries.

use futures_util::{Stream, TryStreamExt, stream};
use uuid::Uuid;

use crate::error::{ApiError, CoinbaseError};
use crate::rest::CoinbaseRestClient;
use crate::rest::endpoints::{self, BATCH_CANCEL, HISTORICAL_BATCH, ORDERS};
use crate::rest::request::RequestDescriptor;
use crate::rest::types::{
    BatchCancelRequest, BatchCancelResponse, CreateOrderResponse, HistoricalOrdersPage,
    HistoricalOrdersQuery, OrderResponse,
};
use crate::types::{Order, OrderPlacementSource, OrderRequest, OrderStatus};

impl CoinbaseRestClient {
    /// Submit an order and return its exchange id.
    ///
    /// A rejected order fails with [`CoinbaseError::Api`] carrying the
    /// `preview_failure_reason`.
    pub async fn create_order(&self, order: &OrderRequest) -> Result<Uuid, CoinbaseError> {
        let request = RequestDescriptor::post(ORDERS, order)?;
        let response: CreateOrderResponse = self.execute(&request).await?;
        order_id_from_response(response)
    }

    /// Cancel one order.
    pub async fn cancel_order(&self, order_id: Uuid) -> Result<(), CoinbaseError> {
        let body = BatchCancelRequest {
            order_ids: vec![order_id],
        };
        let request = RequestDescriptor::post(BATCH_CANCEL, &body)?;
        let response: BatchCancelResponse = self.execute(&request).await?;
        check_cancel_result(response, order_id)?;
        tracing::info!("Order {order_id} canceled successfully.");
        Ok(())
    }

    /// Stream pages of historical orders, following cursors until the last page.
    ///
    /// Pages are requested one at a time, only as the stream is polled.
    pub fn historical_orders_stream<'a>(
        &'a self,
        query: &'a HistoricalOrdersQuery,
    ) -> impl Stream<Item = Result<HistoricalOrdersPage, CoinbaseError>> + Send + 'a {
        // `None` once the last page has been yielded.
        let start: Option<Option<String>> = Some(None);
        stream::try_unfold(start, move |state| async move {
            let Some(cursor) = state else {
                return Ok(None);
            };

            let request = RequestDescriptor::get(HISTORICAL_BATCH)
                .with_query(query.to_query_string(cursor.as_deref())?);
            let page: HistoricalOrdersPage = self.execute(&request).await?;

            let next = if page.has_next {
                match page.cursor.as_deref() {
                    Some(next) if !next.is_empty() => Some(Some(next.to_string())),
                    _ => {
                        return Err(CoinbaseError::InvalidResponse(
                            "historical orders page has has_next=true but no cursor".to_string(),
                        ));
                    }
                }
            } else {
                None
            };
            Ok::<_, CoinbaseError>(Some((page, next)))
        })
    }

    /// Fetch every historical order matching `query`, in server order.
    pub async fn get_historical_orders(
        &self,
        query: &HistoricalOrdersQuery,
    ) -> Result<Vec<Order>, CoinbaseError> {
        self.historical_orders_stream(query)
            .map_ok(|page| page.orders)
            .try_concat()
            .await
    }

    /// Open Advanced Trade orders, optionally for one product.
    pub async fn get_open_orders(&self, product_id: Option<&str>) -> Result<Vec<Order>, CoinbaseError> {
        let mut query = HistoricalOrdersQuery::new(OrderStatus::Open)
            .placement_source(Some(OrderPlacementSource::Advanced));
        if let Some(product_id) = product_id {
            query = query.product_id(product_id);
        }
        self.get_historical_orders(&query).await
    }

    /// Fetch one order by id.
    pub async fn get_order(&self, order_id: Uuid) -> Result<Order, CoinbaseError> {
        let request = RequestDescriptor::get(endpoints::historical_order(&order_id.to_string()));
        let response: OrderResponse = self.execute(&request).await?;
        Ok(response.order)
    }
}

fn order_id_from_response(response: CreateOrderResponse) -> Result<Uuid, CoinbaseError> {
    if response.success {
        return response.success_response.map(|s| s.order_id).ok_or_else(|| {
            CoinbaseError::InvalidResponse("Missing order ID in success response.".to_string())
        });
    }
    match response.error_response {
        Some(error) => Err(CoinbaseError::Api(ApiError::new(
            "create_order",
            error.preview_failure_reason,
        ))),
        None => Err(CoinbaseError::InvalidResponse(
            "Missing error response".to_string(),
        )),
    }
}

fn check_cancel_result(response: BatchCancelResponse, order_id: Uuid) -> Result<(), CoinbaseError> {
    let result = response
        .results
        .into_iter()
        .find(|result| result.order_id == order_id)
        .ok_or_else(|| {
            CoinbaseError::NotFound(format!("Order ID {order_id} not found in response"))
        })?;

    if result.success {
        return Ok(());
    }
    let reason = if result.failure_reason.is_empty() {
        "Unknown reason".to_string()
    } else {
        result.failure_reason
    };
    Err(CoinbaseError::Api(ApiError::new("cancel_order", reason)))
}
