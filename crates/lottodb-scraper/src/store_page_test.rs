use super::*;

/// Builds a listing page with a first-prize block for `first` and a
/// second-prize block for `second`, mimicking the live page's stacked
/// `.group_content` sections.
fn listing_page(first: &[(&str, &str, &str, &str)], second: &[(&str, &str, &str, &str)]) -> String {
    let block = |rows: &[(&str, &str, &str, &str)]| {
        let body: String = rows
            .iter()
            .map(|(pos, name, method, addr)| {
                format!(
                    "<tr><td>{pos}</td><td>{name}</td><td>{method}</td><td>{addr}</td>\
                     <td><a href=\"#\">위치보기</a></td></tr>"
                )
            })
            .collect();
        format!("<div class=\"group_content\"><table><tbody>{body}</tbody></table></div>")
    };
    format!(
        "<html><body>{}{}</body></html>",
        block(first),
        block(second)
    )
}

#[test]
fn parses_only_the_first_prize_block() {
    let html = listing_page(
        &[("1", "복권마을", "자동", "서울 강남구 테헤란로 1")],
        &[("1", "이등가게", "수동", "부산 해운대구 2")],
    );
    let rows = parse_store_page(&html);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "복권마을");
    assert_eq!(rows[0].method, SaleMethod::Auto);
    assert_eq!(rows[0].address, "서울 강남구 테헤란로 1");
}

#[test]
fn short_rows_are_skipped_silently() {
    let html = "<div class=\"group_content\"><table><tbody>\
                <tr><td>1</td><td>외톨이</td></tr>\
                <tr><td>2</td><td>온전한가게</td><td>수동</td><td>대구 중구 3</td></tr>\
                </tbody></table></div>";
    let rows = parse_store_page(html);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "온전한가게");
    assert_eq!(rows[0].method, SaleMethod::Manual);
}

#[test]
fn url_shaped_names_are_filtered_out() {
    let html = listing_page(
        &[
            ("1", "https://dhlottery.co.kr", "자동", "서울 중구 1"),
            ("2", "복권마을", "자동", "서울 강남구 2"),
        ],
        &[],
    );
    let rows = parse_store_page(&html);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "복권마을");
}

#[test]
fn missing_prize_block_yields_empty_vec() {
    let rows = parse_store_page("<html><body><p>점검 중입니다</p></body></html>");
    assert!(rows.is_empty());
}

#[test]
fn invalid_name_filter_cases() {
    assert!(is_invalid_store_name(""));
    assert!(is_invalid_store_name("가"));
    assert!(is_invalid_store_name("http://example.com"));
    assert!(is_invalid_store_name("WWW.lotto.kr"));
    assert!(is_invalid_store_name("내멋대로.net"));
    assert!(is_invalid_store_name("dhlottery 당첨점"));
    assert!(!is_invalid_store_name("복권마을"));
    assert!(!is_invalid_store_name("GS25 역삼점"));
}

#[test]
fn region_base_token_only() {
    assert_eq!(extract_region("서울 강남구 테헤란로 1"), "서울");
    assert_eq!(extract_region("부산 해운대구 2"), "부산");
}

#[test]
fn region_admin_suffix_is_folded_in() {
    assert_eq!(extract_region("서울 특별시 강남구"), "서울특별시");
    assert_eq!(extract_region("부산 광역시 해운대구"), "부산광역시");
    assert_eq!(extract_region("세종 특별자치시 조치원읍"), "세종특별자치시");
}

#[test]
fn region_full_admin_name_passes_through() {
    assert_eq!(extract_region("서울특별시 강남구 테헤란로"), "서울특별시");
    assert_eq!(extract_region("경기도 수원시 팔달구"), "경기도");
}

#[test]
fn region_province_abbreviation_is_completed() {
    assert_eq!(extract_region("경기 수원시 장안구"), "경기도");
    assert_eq!(extract_region("전북 전주시 완산구"), "전북도");
}

#[test]
fn region_empty_address_falls_back() {
    assert_eq!(extract_region(""), REGION_FALLBACK);
    assert_eq!(extract_region("   "), REGION_FALLBACK);
}
