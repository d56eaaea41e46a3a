#[cfg(test)]
mod tests {
    use crate::commands::utils;

    #[test]
    fn test_validate_url_accepts_web_and_file_schemes() {
        assert!(utils::validate_url("https://example.com").is_ok());
        assert!(utils::validate_url("http://localhost:8080/page").is_ok());
        assert!(utils::validate_url("file:///tmp/page.html").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(utils::validate_url("not a url").is_err());
        assert!(utils::validate_url("ftp://example.com").is_err());
        assert!(utils::validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_browser_type_parsing() {
        use crate::webdriver::BrowserType;
        use std::str::FromStr;

        assert!(matches!(
            BrowserType::from_str("firefox").unwrap(),
            BrowserType::Firefox
        ));
        assert!(matches!(
            BrowserType::from_str("Chrome").unwrap(),
            BrowserType::Chrome
        ));
        assert!(matches!(
            BrowserType::from_str("chromium").unwrap(),
            BrowserType::Chrome
        ));
        assert!(BrowserType::from_str("safari").is_err());
    }

    #[test]
    fn test_browser_type_driver_commands() {
        use crate::webdriver::BrowserType;

        assert_eq!(BrowserType::Firefox.driver_command(), "geckodriver");
        assert_eq!(BrowserType::Chrome.driver_command(), "chromedriver");
        assert_eq!(BrowserType::Firefox.default_port(), 4444);
        assert_eq!(BrowserType::Chrome.default_port(), 9515);
    }
}
