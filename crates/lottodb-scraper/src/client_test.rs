use super::*;

fn test_client() -> LottoClient {
    LottoClient::new("https://www.dhlottery.co.kr/", 5, "lottodb-test/0.1", 1, 0)
        .expect("failed to build test LottoClient")
}

#[test]
fn store_page_url_without_round_is_current_listing() {
    let client = test_client();
    assert_eq!(
        client.store_page_url(None),
        "https://www.dhlottery.co.kr/store.do?method=topStore&pageGubun=L645"
    );
}

#[test]
fn store_page_url_with_round_appends_drw_no() {
    let client = test_client();
    assert_eq!(
        client.store_page_url(Some(601)),
        "https://www.dhlottery.co.kr/store.do?method=topStore&pageGubun=L645&drwNo=601"
    );
}

#[test]
fn base_url_trailing_slash_is_stripped() {
    let client = LottoClient::new("http://localhost:9/", 5, "t", 1, 0).unwrap();
    assert_eq!(
        client.store_page_url(None),
        "http://localhost:9/store.do?method=topStore&pageGubun=L645"
    );
}
