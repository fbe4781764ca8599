#[cfg(test)]
mod database_tests {
    use crate::repository::*;
    use crate::*;
    use sqlx::SqliteConnection;

    pub async fn setup_test_db() -> sqlx::sqlite::SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database pool");

        StatsDatabase::new(pool.clone())
            .run_migrations()
            .await
            .expect("Failed to run test migrations");

        pool
    }

    async fn insert_game(conn: &mut SqliteConnection, id: i64, map: &str, mode: i64, mutators: i64) {
        sqlx::query("INSERT INTO games (id, time, map, mode, mutators) VALUES (?, ?, ?, ?, ?)")
            .bind(id)
            .bind(chrono::Utc::now())
            .bind(map)
            .bind(mode)
            .bind(mutators)
            .execute(&mut *conn)
            .await
            .expect("Failed to insert game");
    }

    async fn insert_player(conn: &mut SqliteConnection, game_id: i64, handle: &str, name: &str, score: i64) {
        sqlx::query("INSERT INTO game_players (game_id, handle, name, score) VALUES (?, ?, ?, ?)")
            .bind(game_id)
            .bind(handle)
            .bind(name)
            .bind(score)
            .execute(&mut *conn)
            .await
            .expect("Failed to insert player");
    }

    async fn insert_server(conn: &mut SqliteConnection, game_id: i64, handle: &str) {
        sqlx::query("INSERT INTO game_servers (game_id, handle) VALUES (?, ?)")
            .bind(game_id)
            .bind(handle)
            .execute(&mut *conn)
            .await
            .expect("Failed to insert server");
    }

    async fn insert_weapon(
        conn: &mut SqliteConnection,
        game_id: i64,
        handle: &str,
        weapon: &str,
        damage1: i64,
        shots2: i64,
    ) {
        sqlx::query(
            "INSERT INTO game_weapons (game_id, playerhandle, weapon, timewielded, damage1, shots2)
             VALUES (?, ?, ?, 10, ?, ?)",
        )
        .bind(game_id)
        .bind(handle)
        .bind(weapon)
        .bind(damage1)
        .bind(shots2)
        .execute(&mut *conn)
        .await
        .expect("Failed to insert weapon usage");
    }

    #[tokio::test]
    async fn test_distinct_handles_skip_unregistered() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        insert_game(&mut conn, 1, "dutility", 2, 0).await;
        insert_player(&mut conn, 1, "zed", "Zed", 10).await;
        insert_player(&mut conn, 1, "", "unnamed", 5).await;
        insert_player(&mut conn, 1, "amy", "Amy", 3).await;
        insert_player(&mut conn, 2, "amy", "Amy", 7).await;

        let handles = distinct_handles(&mut conn, ParticipationTable::Players)
            .await
            .unwrap();
        assert_eq!(handles, vec!["amy".to_string(), "zed".to_string()]);

        let count = count_handles(&mut conn, ParticipationTable::Players)
            .await
            .unwrap();
        assert_eq!(count, handles.len());

        assert!(handle_exists(&mut conn, ParticipationTable::Players, "amy").await.unwrap());
        assert!(!handle_exists(&mut conn, ParticipationTable::Players, "").await.unwrap());
        assert!(!handle_exists(&mut conn, ParticipationTable::Servers, "amy").await.unwrap());
    }

    #[tokio::test]
    async fn test_live_game_ids_drop_pruned_matches() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        insert_game(&mut conn, 1, "dutility", 2, 0).await;
        insert_game(&mut conn, 3, "dutility", 2, 0).await;
        insert_server(&mut conn, 3, "eu1").await;
        insert_server(&mut conn, 2, "eu1").await;
        insert_server(&mut conn, 1, "eu1").await;

        let ids = live_game_ids(&mut conn, ParticipationTable::Servers, "eu1")
            .await
            .unwrap();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_map_queries() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        insert_game(&mut conn, 1, "wet", 2, 0).await;
        insert_game(&mut conn, 2, "bath", 2, 0).await;
        insert_game(&mut conn, 3, "wet", 6, 0).await;

        assert_eq!(
            distinct_maps(&mut conn).await.unwrap(),
            vec!["bath".to_string(), "wet".to_string()]
        );
        assert_eq!(count_maps(&mut conn).await.unwrap(), 2);
        assert!(map_exists(&mut conn, "wet").await.unwrap());
        assert!(!map_exists(&mut conn, "dry").await.unwrap());
        assert_eq!(map_game_ids(&mut conn, "wet").await.unwrap(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_games_by_ids_batches_and_skips_missing() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        for id in 1..=(GAME_ID_BATCH as i64 + 20) {
            insert_game(&mut conn, id, "wet", 2, 0).await;
        }

        assert!(games_by_ids(&mut conn, &[]).await.unwrap().is_empty());

        let ids: Vec<i64> = (1..=(GAME_ID_BATCH as i64 + 30)).rev().collect();
        let games = games_by_ids(&mut conn, &ids).await.unwrap();
        assert_eq!(games.len(), GAME_ID_BATCH + 20);
        assert_eq!(games.first().map(|g| g.id), Some(1));
        assert_eq!(games.last().map(|g| g.id), Some(GAME_ID_BATCH as i64 + 20));
    }

    #[tokio::test]
    async fn test_weapon_totals_by_scope() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        insert_weapon(&mut conn, 1, "amy", "rifle", 100, 2).await;
        insert_weapon(&mut conn, 1, "zed", "rifle", 50, 1).await;
        insert_weapon(&mut conn, 2, "amy", "rifle", 25, 4).await;
        insert_weapon(&mut conn, 2, "amy", "pistol", 5, 9).await;

        let all = weapon_totals(&mut conn, "rifle", &WeaponScope::All).await.unwrap();
        assert_eq!(all.damage1, 175);
        assert_eq!(all.shots2, 7);
        assert_eq!(all.timewielded, 30);

        let amy = weapon_totals(&mut conn, "rifle", &WeaponScope::Player("amy".to_string()))
            .await
            .unwrap();
        assert_eq!(amy.damage1, 125);

        let game = weapon_totals(&mut conn, "rifle", &WeaponScope::Game(1)).await.unwrap();
        assert_eq!(game.damage1, 150);

        let both = weapon_totals(
            &mut conn,
            "rifle",
            &WeaponScope::GamePlayer(2, "amy".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(both.damage1, 25);
        assert_eq!(both.shots2, 4);

        let unused = weapon_totals(&mut conn, "sword", &WeaponScope::All).await.unwrap();
        assert!(unused.is_zero());

        let grouped = weapon_totals_by_weapon(&mut conn, &WeaponScope::Player("amy".to_string()))
            .await
            .unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["rifle"], amy);
        assert_eq!(grouped["pistol"].shots2, 9);
    }

    #[tokio::test]
    async fn test_best_race_times() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let rules = RuleFilter {
            mode: 6,
            mutators: 1 << 15,
        };

        insert_game(&mut conn, 1, "racetrack", 6, 1 << 15).await;
        insert_game(&mut conn, 2, "racetrack", 6, (1 << 15) | 2).await;
        insert_game(&mut conn, 3, "racetrack", 6, 1 << 15).await;
        insert_game(&mut conn, 4, "racetrack", 6, 0).await;
        insert_game(&mut conn, 5, "racetrack", 2, 1 << 15).await;
        insert_game(&mut conn, 6, "elsewhere", 6, 1 << 15).await;

        insert_player(&mut conn, 1, "a", "Ace", 50).await;
        insert_player(&mut conn, 2, "a", "Ace", 30).await;
        insert_player(&mut conn, 3, "a", "Ace!", 30).await;
        insert_player(&mut conn, 1, "b", "Bee", 0).await;
        insert_player(&mut conn, 3, "c", "Cee", 40).await;
        insert_player(&mut conn, 3, "", "guest", 1).await;
        insert_player(&mut conn, 4, "d", "Dee", 1).await;
        insert_player(&mut conn, 5, "d", "Dee", 1).await;
        insert_player(&mut conn, 6, "d", "Dee", 1).await;

        let times = best_race_times(&mut conn, "racetrack", rules, 10).await.unwrap();
        assert_eq!(
            times,
            vec![
                RaceTime {
                    game_id: 2,
                    handle: "a".to_string(),
                    name: "Ace".to_string(),
                    score: 30,
                },
                RaceTime {
                    game_id: 3,
                    handle: "c".to_string(),
                    name: "Cee".to_string(),
                    score: 40,
                },
            ]
        );

        let limited = best_race_times(&mut conn, "racetrack", rules, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].handle, "a");
    }
}
