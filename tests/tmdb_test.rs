//! TMDB API client tests
//!
//! Tests search, metadata retrieval, and error handling.

use cinetui::api::{TmdbClient, TmdbError};
use cinetui::models::MediaType;
use mockito::{Matcher, Server};

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_parses_results() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "page": 1,
        "results": [
            {
                "id": 414906,
                "media_type": "movie",
                "title": "The Batman",
                "release_date": "2022-03-01",
                "poster_path": "/74xTEgt7R36Fpooo50r9T25onhq.jpg",
                "vote_average": 7.8
            },
            {
                "id": 3894,
                "media_type": "person",
                "name": "Christian Bale"
            },
            {
                "id": 2098,
                "media_type": "tv",
                "name": "Batman: The Animated Series",
                "first_air_date": "1992-09-05",
                "poster_path": "/lBomQFW1vlm1yUYMNSbFZ45R4Ox.jpg",
                "vote_average": 8.5
            }
        ],
        "total_results": 3,
        "total_pages": 1
    }"#;

    let mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), "test_key".into()),
            Matcher::UrlEncoded("language".into(), "en-US".into()),
            Matcher::UrlEncoded("query".into(), "batman".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("include_adult".into(), "false".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let results = client.search_multi("batman").await.unwrap();

    mock.assert_async().await;

    // Person entries never reach the UI
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].id, 414906);
    assert_eq!(results[0].media_type, MediaType::Movie);
    assert_eq!(results[0].title, "The Batman");
    assert_eq!(results[0].year(), Some(2022));

    // TV uses name/first_air_date
    assert_eq!(results[1].id, 2098);
    assert_eq!(results[1].media_type, MediaType::Tv);
    assert_eq!(results[1].title, "Batman: The Animated Series");
    assert_eq!(results[1].year(), Some(1992));
}

#[tokio::test]
async fn test_search_empty_results() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"page": 1, "results": [], "total_results": 0, "total_pages": 0}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let results = client.search_multi("xyzzy").await.unwrap();

    mock.assert_async().await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_sends_configured_language() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::UrlEncoded("language".into(), "de-DE".into()))
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url()).with_language("de-DE");
    client.search_multi("dark").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unrated_result_has_no_score() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"results": [{"id": 7, "media_type": "movie", "title": "Unreleased", "vote_average": 0}]}"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let results = client.search_multi("unreleased").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].vote_average, None);
    assert_eq!(results[0].year(), None);
}

// =============================================================================
// Movie Tests
// =============================================================================

#[tokio::test]
async fn test_movie_details() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/27205")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "id": 27205,
                "title": "Inception",
                "release_date": "2010-07-15",
                "runtime": 148,
                "vote_average": 8.4,
                "overview": "Cobb, a skilled thief...",
                "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}, {"id": 12, "name": "Adventure"}],
                "production_companies": [
                    {"id": 923, "name": "Legendary Pictures"},
                    {"id": 9996, "name": "Syncopy"},
                    {"id": 174, "name": "Warner Bros. Pictures"}
                ],
                "production_countries": [{"iso_3166_1": "US", "name": "United States of America"}],
                "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
                "backdrop_path": null
            }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let movie = client.movie_details(27205).await.unwrap();

    mock.assert_async().await;

    assert_eq!(movie.title, "Inception");
    assert_eq!(movie.year(), Some(2010));
    assert_eq!(movie.runtime_str().as_deref(), Some("2h 28m"));
    assert_eq!(movie.genres_str().as_deref(), Some("Action, Science Fiction"));
    assert_eq!(
        movie.companies_str().as_deref(),
        Some("Legendary Pictures, Syncopy & others")
    );
    assert_eq!(movie.countries_str().as_deref(), Some("United States of America"));
}

#[tokio::test]
async fn test_movie_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/999999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"status_code": 34, "status_message": "The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.movie_details(999999999).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<TmdbError>(), Some(TmdbError::NotFound)));
}

#[tokio::test]
async fn test_server_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.movie_details(1).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::ServerError(503))
    ));
}

#[tokio::test]
async fn test_rate_limit_retries_then_gives_up() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("Retry-After", "0")
        .expect(3)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.movie_details(1).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::RateLimited)
    ));
}

#[tokio::test]
async fn test_malformed_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.movie_details(1).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::InvalidResponse(_))
    ));
}

// =============================================================================
// TV Tests
// =============================================================================

const SERIES_BODY: &str = r#"{
    "id": 1396,
    "name": "Breaking Bad",
    "first_air_date": "2008-01-20",
    "vote_average": 8.9,
    "overview": "A chemistry teacher diagnosed with cancer...",
    "genres": [{"id": 18, "name": "Drama"}],
    "seasons": [
        {"season_number": 0, "name": "Specials"},
        {"season_number": 1, "name": "Season 1"},
        {"season_number": 2, "name": "Season 2"}
    ]
}"#;

#[tokio::test]
async fn test_series_details() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/tv/1396")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SERIES_BODY)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let series = client.series_details(1396).await.unwrap();

    assert_eq!(series.name, "Breaking Bad");
    assert_eq!(series.year(), Some(2008));
    assert_eq!(series.season_numbers, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_all_episodes_fetches_every_season() {
    let mut server = Server::new_async().await;

    let _series = server
        .mock("GET", "/tv/1396")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SERIES_BODY)
        .create_async()
        .await;

    let season_mocks = [
        (0, r#"{"name": "Specials", "episodes": [{"episode_number": 1, "name": "Good Cop Bad Cop"}]}"#),
        (1, r#"{"name": "Season 1", "episodes": [
            {"episode_number": 2, "name": "Cat's in the Bag..."},
            {"episode_number": 1, "name": "Pilot"}
        ]}"#),
        (2, r#"{"name": "Season 2", "episodes": [{"episode_number": 1, "name": "Seven Thirty-Seven"}]}"#),
    ];

    let mut mocks = Vec::new();
    for (number, body) in season_mocks {
        mocks.push(
            server
                .mock("GET", format!("/tv/1396/season/{}", number).as_str())
                .match_query(Matcher::Any)
                .with_status(200)
                .with_body(body)
                .create_async()
                .await,
        );
    }

    let client = TmdbClient::with_base_url("test_key", server.url());
    let seasons = client.all_episodes(1396).await.unwrap();

    for mock in &mocks {
        mock.assert_async().await;
    }

    // Raw catalog data: specials kept, order as listed by the series
    assert_eq!(seasons.len(), 3);
    assert_eq!(seasons[0].season_number, 0);
    assert_eq!(seasons[1].season_number, 1);
    assert_eq!(seasons[1].episodes.len(), 2);
    assert_eq!(seasons[1].episodes[0].name.as_deref(), Some("Cat's in the Bag..."));
}

#[tokio::test]
async fn test_all_episodes_fails_when_a_season_fails() {
    let mut server = Server::new_async().await;

    let _series = server
        .mock("GET", "/tv/1396")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SERIES_BODY)
        .create_async()
        .await;
    let _ok = server
        .mock("GET", Matcher::Regex(r"^/tv/1396/season/[01]$".into()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"episodes": []}"#)
        .create_async()
        .await;
    let _broken = server
        .mock("GET", "/tv/1396/season/2")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.all_episodes(1396).await.is_err());
}
