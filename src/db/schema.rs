diesel::table! {
    video_analyses (id) {
        id -> Uuid,
        youtube_url -> Varchar,
        transcript -> Text,
        analysis_result -> Jsonb,
        prompt_version -> Varchar,
        created_at -> Timestamptz,
        analysis_duration -> Float8,
    }
}
