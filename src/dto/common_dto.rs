use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::service_point_loader::{Page, PageMeta};

// Respuesta `{ data }` de los endpoints de consulta
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// Listado upstream reexpuesto con sus metadatos de paginación
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl<T> From<Page<T>> for ListResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            meta: page.meta,
        }
    }
}

// Query `?size=&page=` de los proxies de listados
#[derive(Debug, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 1000))]
    pub size: Option<u32>,
    pub page: Option<u32>,
}

impl PageQuery {
    pub const DEFAULT_SIZE: u32 = 500;

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(Self::DEFAULT_SIZE)
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }
}
