use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;

use crate::domain::repository::PaymentRepository;
use crate::domain::types::Payment;
use crate::error::MarketError;

pub struct ListPaymentsUseCase<P: PaymentRepository> {
    pub payments: P,
}

impl<P: PaymentRepository> ListPaymentsUseCase<P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Payment>, MarketError> {
        self.payments.list_by_user(user_id, page.clamped()).await
    }
}
