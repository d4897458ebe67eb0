use crate::domain::AppError;

/// Minimal blocking HTTP access used for probes and downloads.
pub trait HttpClient {
    /// GET `url` and return the body of a 2xx response.
    fn get_text(&self, url: &str) -> Result<String, AppError>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get_text(&self, url: &str) -> Result<String, AppError> {
        (**self).get_text(url)
    }
}
